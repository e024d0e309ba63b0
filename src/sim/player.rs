//! Player character: input-driven movement, jumping and power levels

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::tick::StepInput;
use crate::tuning::Tuning;

/// Player hit-box width (all power levels)
pub const PLAYER_WIDTH: f32 = 28.0;
/// Hit-box height while small
pub const SMALL_HEIGHT: f32 = 32.0;
/// Hit-box height while big or fire
pub const BIG_HEIGHT: f32 = 48.0;

/// Walk cycle frames
const WALK_FRAMES: u8 = 3;
/// Walk frame advances once the timer passes this
const WALK_FRAME_TICKS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Power tiers, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerLevel {
    #[default]
    Small,
    Big,
    Fire,
}

impl PowerLevel {
    /// Hit-box height for this tier
    pub fn height(self) -> f32 {
        match self {
            PowerLevel::Small => SMALL_HEIGHT,
            PowerLevel::Big | PowerLevel::Fire => BIG_HEIGHT,
        }
    }
}

/// Result of the player being hit by an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Invulnerable, nothing happened
    Ignored,
    /// Dropped back to small and became invulnerable
    PowerLost,
    /// Was small: the hit kills
    Lethal,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    /// Set while airborne; a new jump needs a landing first
    pub jump_locked: bool,
    pub power: PowerLevel,
    /// Remaining invulnerability steps (0 = vulnerable)
    pub invulnerable_ticks: u32,
    pub anim_frame: u8,
    #[serde(default)]
    anim_timer: u8,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            body: Body::new(spawn, Vec2::new(PLAYER_WIDTH, SMALL_HEIGHT)),
            facing: Facing::Right,
            jump_locked: false,
            power: PowerLevel::Small,
            invulnerable_ticks: 0,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    /// Apply one step of input, gravity and integration.
    ///
    /// Returns true if a jump started this step.
    pub fn advance(&mut self, input: &StepInput, tuning: &Tuning) -> bool {
        let speed = tuning.move_speed(input.run);
        if input.left {
            self.body.vel.x = -speed;
            self.facing = Facing::Left;
        } else if input.right {
            self.body.vel.x = speed;
            self.facing = Facing::Right;
        } else {
            self.body.vel.x *= tuning.friction;
            if self.body.vel.x.abs() < tuning.stop_epsilon {
                self.body.vel.x = 0.0;
            }
        }

        let mut jumped = false;
        if input.jump && self.body.grounded && !self.jump_locked {
            self.body.vel.y = tuning.jump_velocity;
            self.jump_locked = true;
            self.body.grounded = false;
            jumped = true;
        }

        // Variable jump height: letting go early cuts the rise
        if !input.jump && self.body.vel.y < 0.0 {
            self.body.vel.y *= tuning.jump_cut;
        }

        if !self.body.grounded {
            self.jump_locked = true;
        }

        self.body.apply_gravity(tuning.gravity, tuning.max_fall_speed);
        self.body.integrate();

        if self.body.vel.x != 0.0 {
            self.anim_timer += 1;
            if self.anim_timer > WALK_FRAME_TICKS {
                self.anim_frame = (self.anim_frame + 1) % WALK_FRAMES;
                self.anim_timer = 0;
            }
        } else {
            self.anim_frame = 0;
        }

        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);

        jumped
    }

    /// Came to rest on top of a block
    pub fn land(&mut self) {
        self.jump_locked = false;
    }

    /// Small → Big. Returns false if already powered up.
    pub fn grow(&mut self) -> bool {
        if self.power != PowerLevel::Small {
            return false;
        }
        self.set_power(PowerLevel::Big);
        true
    }

    /// Resolve an enemy hit against the current power level
    pub fn take_hit(&mut self, tuning: &Tuning) -> Hit {
        if self.is_invulnerable() {
            return Hit::Ignored;
        }
        match self.power {
            PowerLevel::Big | PowerLevel::Fire => {
                self.set_power(PowerLevel::Small);
                self.invulnerable_ticks = tuning.invulnerable_ticks;
                Hit::PowerLost
            }
            PowerLevel::Small => Hit::Lethal,
        }
    }

    /// Back to the spawn point after losing a life
    pub fn respawn(&mut self, spawn: Vec2, tuning: &Tuning) {
        self.set_power(PowerLevel::Small);
        self.body.pos = spawn;
        self.body.vel = Vec2::ZERO;
        self.body.grounded = false;
        self.invulnerable_ticks = tuning.invulnerable_ticks;
    }

    fn set_power(&mut self, power: PowerLevel) {
        self.power = power;
        self.body.set_height_keep_feet(power.height());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_player() -> Player {
        let mut player = Player::new(Vec2::new(100.0, 384.0));
        player.body.grounded = true;
        player
    }

    #[test]
    fn test_walk_and_run_speeds() {
        let tuning = Tuning::default();
        let mut player = grounded_player();
        player.advance(
            &StepInput {
                right: true,
                ..Default::default()
            },
            &tuning,
        );
        assert_eq!(player.body.vel.x, 3.0);
        assert_eq!(player.facing, Facing::Right);

        player.advance(
            &StepInput {
                left: true,
                run: true,
                ..Default::default()
            },
            &tuning,
        );
        assert_eq!(player.body.vel.x, -5.0);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn test_friction_snaps_to_zero() {
        let tuning = Tuning::default();
        let mut player = grounded_player();
        player.body.vel.x = 3.0;
        let idle = StepInput::default();
        for _ in 0..40 {
            player.advance(&idle, &tuning);
        }
        assert_eq!(player.body.vel.x, 0.0);
        assert_eq!(player.anim_frame, 0);
    }

    #[test]
    fn test_jump_requires_ground_and_release() {
        let tuning = Tuning::default();
        let mut player = grounded_player();
        let jump = StepInput {
            jump: true,
            ..Default::default()
        };
        assert!(player.advance(&jump, &tuning));
        // -14 then gravity
        assert!((player.body.vel.y - (-13.4)).abs() < 1e-4);
        assert!(player.jump_locked);
        assert!(!player.body.grounded);

        // Holding jump in mid-air does nothing more
        assert!(!player.advance(&jump, &tuning));
    }

    #[test]
    fn test_releasing_jump_cuts_rise() {
        let tuning = Tuning::default();
        let mut held = grounded_player();
        let mut released = grounded_player();
        let jump = StepInput {
            jump: true,
            ..Default::default()
        };
        held.advance(&jump, &tuning);
        released.advance(&jump, &tuning);

        held.advance(&jump, &tuning);
        released.advance(&StepInput::default(), &tuning);
        assert!(released.body.vel.y > held.body.vel.y);
    }

    #[test]
    fn test_grow_keeps_feet_planted() {
        let mut player = grounded_player();
        let feet = player.body.bottom();
        assert!(player.grow());
        assert_eq!(player.power, PowerLevel::Big);
        assert_eq!(player.body.size.y, BIG_HEIGHT);
        assert_eq!(player.body.bottom(), feet);
        assert!(!player.grow());
    }

    #[test]
    fn test_big_player_shrinks_on_hit() {
        let tuning = Tuning::default();
        let mut player = grounded_player();
        player.grow();
        assert_eq!(player.take_hit(&tuning), Hit::PowerLost);
        assert_eq!(player.power, PowerLevel::Small);
        assert_eq!(player.body.size.y, SMALL_HEIGHT);
        assert_eq!(player.invulnerable_ticks, 180);
        assert_eq!(player.take_hit(&tuning), Hit::Ignored);
    }

    #[test]
    fn test_small_player_hit_is_lethal() {
        let tuning = Tuning::default();
        let mut player = grounded_player();
        assert_eq!(player.take_hit(&tuning), Hit::Lethal);
    }

    #[test]
    fn test_invulnerability_counts_down() {
        let tuning = Tuning::default();
        let mut player = grounded_player();
        player.invulnerable_ticks = 2;
        player.advance(&StepInput::default(), &tuning);
        assert!(player.is_invulnerable());
        player.advance(&StepInput::default(), &tuning);
        assert!(!player.is_invulnerable());
    }
}
