//! Patrolling enemies
//!
//! Walker: walking → squashed → removed.
//! Shelled: walking → shell (idle, counts down back to walking) → sliding once
//! kicked. A sliding shell never reverts and ignores the patrol probe.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::BlockKind;
use super::body::Body;
use super::grid::TileGrid;
use crate::tuning::Tuning;

pub const ENEMY_WIDTH: f32 = 28.0;
pub const WALKER_HEIGHT: f32 = 28.0;
pub const SHELLED_HEIGHT: f32 = 38.0;
/// Height of a shelled enemy while in shell form
pub const SHELL_HEIGHT: f32 = 28.0;

/// Walk cycle frames
const WALK_FRAMES: u8 = 2;
/// Walk frame advances once the timer passes this
const WALK_FRAME_TICKS: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Walker,
    Shelled,
}

impl EnemyKind {
    /// Hit-box of the walking form
    pub fn size(self) -> Vec2 {
        match self {
            EnemyKind::Walker => Vec2::new(ENEMY_WIDTH, WALKER_HEIGHT),
            EnemyKind::Shelled => Vec2::new(ENEMY_WIDTH, SHELLED_HEIGHT),
        }
    }
}

/// Enemy state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Patrolling
    Walking,
    /// Flattened; removed when `remaining` reaches 0
    Squashed { remaining: u32 },
    /// Idle shell; walks again when `revert_in` reaches 0
    Shell { revert_in: u32 },
    /// Kicked shell
    Sliding,
}

/// What a stomp did to the enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stomp {
    Squashed,
    Shelled,
    Kicked,
    /// Already squashed or sliding
    NoEffect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub state: EnemyState,
    pub anim_frame: u8,
    #[serde(default)]
    anim_timer: u8,
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Self {
        Self {
            kind,
            state: EnemyState::Walking,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    /// Body for a fresh enemy, heading left
    pub fn spawn_body(kind: EnemyKind, pos: Vec2, tuning: &Tuning) -> Body {
        let mut body = Body::new(pos, kind.size());
        body.vel.x = -tuning.enemy_speed;
        body
    }

    /// Touching it does not hurt the player
    pub fn is_harmless(&self) -> bool {
        matches!(
            self.state,
            EnemyState::Squashed { .. } | EnemyState::Shell { .. }
        )
    }

    /// Takes part in gravity and tile collision
    pub fn is_physical(&self) -> bool {
        !matches!(self.state, EnemyState::Squashed { .. })
    }

    /// One step of timers, kinematics and patrol
    pub fn advance(&mut self, body: &mut Body, grid: &TileGrid, tuning: &Tuning) {
        match self.state {
            EnemyState::Squashed { remaining } => {
                let remaining = remaining.saturating_sub(1);
                self.state = EnemyState::Squashed { remaining };
                if remaining == 0 {
                    body.active = false;
                }
                return;
            }
            EnemyState::Shell { revert_in } => {
                let revert_in = revert_in.saturating_sub(1);
                if revert_in == 0 {
                    self.state = EnemyState::Walking;
                    body.set_height_keep_feet(self.kind.size().y);
                    body.vel.x = -tuning.enemy_speed;
                } else {
                    self.state = EnemyState::Shell { revert_in };
                }
            }
            EnemyState::Walking | EnemyState::Sliding => {}
        }

        body.apply_gravity(tuning.gravity, tuning.max_fall_speed);
        body.integrate();

        if self.state == EnemyState::Walking {
            if body.grounded && body.vel.x != 0.0 && should_turn(grid, body, tuning.probe_distance)
            {
                body.vel.x = -body.vel.x;
            }

            self.anim_timer += 1;
            if self.anim_timer > WALK_FRAME_TICKS {
                self.anim_frame = (self.anim_frame + 1) % WALK_FRAMES;
                self.anim_timer = 0;
            }
        }
    }

    /// The player landed on top of this enemy
    pub fn stomp(&mut self, body: &mut Body, player_x: f32, tuning: &Tuning) -> Stomp {
        match (self.kind, self.state) {
            (EnemyKind::Walker, EnemyState::Walking) => {
                self.state = EnemyState::Squashed {
                    remaining: tuning.squash_ticks,
                };
                body.vel.x = 0.0;
                Stomp::Squashed
            }
            (EnemyKind::Shelled, EnemyState::Walking) => {
                self.state = EnemyState::Shell {
                    revert_in: tuning.shell_ticks,
                };
                body.set_height_keep_feet(SHELL_HEIGHT);
                body.vel.x = 0.0;
                Stomp::Shelled
            }
            (_, EnemyState::Shell { .. }) => {
                // Kick away from the player's side
                body.vel.x = if player_x < body.pos.x {
                    tuning.shell_kick_speed
                } else {
                    -tuning.shell_kick_speed
                };
                self.state = EnemyState::Sliding;
                Stomp::Kicked
            }
            _ => Stomp::NoEffect,
        }
    }
}

/// Ledge/wall turnaround probe.
///
/// Looks `probe` pixels past the leading edge: no floor tile under the feet
/// means a ledge, a brick or question block at body height means a wall.
pub fn should_turn(grid: &TileGrid, body: &Body, probe: f32) -> bool {
    let ahead_x = if body.vel.x > 0.0 {
        body.right() + probe
    } else {
        body.pos.x - probe
    };
    let feet = body.bottom();

    let floor = grid.tile_type_at(ahead_x, feet);
    let wall = grid.tile_type_at(ahead_x, feet - 1.0);

    floor.is_none() || matches!(wall, Some(BlockKind::Brick | BlockKind::Question))
}
