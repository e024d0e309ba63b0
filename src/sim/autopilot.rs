//! Demo autopilot
//!
//! Plays the game for attract mode and the headless runner: runs right and
//! jumps at enemies, walls and gaps, plus the occasional random hop. Seeded,
//! so a given seed and level always play out the same way.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{ActorKind, GameState};
use super::tick::StepInput;

/// How far ahead (pixels) an enemy triggers a jump
const ENEMY_LOOKAHEAD: f32 = 72.0;
/// How far ahead the wall and gap probes look
const WALL_PROBE: f32 = 8.0;
const GAP_PROBE: f32 = 20.0;
/// Chance per grounded step of a random hop
const RANDOM_HOP: f64 = 0.02;

#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    /// Steps left to keep jump held
    jump_hold: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            jump_hold: 0,
        }
    }

    /// Decide the input for the next step
    pub fn next_input(&mut self, state: &GameState) -> StepInput {
        let mut input = StepInput {
            right: true,
            run: true,
            ..Default::default()
        };

        if self.jump_hold > 0 {
            self.jump_hold -= 1;
            input.jump = true;
            return input;
        }

        let player = &state.player;
        if player.body.grounded && !player.jump_locked {
            let hazard = enemy_ahead(state) || wall_ahead(state) || gap_ahead(state);
            if hazard || self.rng.random_bool(RANDOM_HOP) {
                // Longer holds jump higher
                self.jump_hold = self.rng.random_range(6..=24);
                input.jump = true;
            }
        }

        input
    }
}

fn enemy_ahead(state: &GameState) -> bool {
    let body = &state.player.body;
    state.actors.iter().any(|actor| match &actor.kind {
        ActorKind::Enemy(enemy) if !enemy.is_harmless() => {
            let dx = actor.body.pos.x - body.right();
            let same_level = actor.body.bottom() > body.pos.y && actor.body.pos.y < body.bottom();
            (0.0..ENEMY_LOOKAHEAD).contains(&dx) && same_level
        }
        _ => false,
    })
}

fn wall_ahead(state: &GameState) -> bool {
    let body = &state.player.body;
    state
        .grid
        .tile_type_at(body.right() + WALL_PROBE, body.bottom() - 1.0)
        .is_some()
}

fn gap_ahead(state: &GameState) -> bool {
    let body = &state.player.body;
    state
        .grid
        .tile_type_at(body.right() + GAP_PROBE, body.bottom() + 1.0)
        .is_none()
}
