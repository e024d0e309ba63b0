//! Collectibles: coins and the power-up mushroom

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::enemy::should_turn;
use super::grid::TileGrid;
use crate::consts::TILE_SIZE;
use crate::tuning::Tuning;

pub const COIN_SIZE: f32 = 24.0;
pub const MUSHROOM_SIZE: f32 = 28.0;

/// Spin cycle frames
const COIN_FRAMES: u8 = 4;
/// Spin frame advances once the timer passes this
const COIN_FRAME_TICKS: u8 = 10;
/// Float bob speed and amplitude (pixels)
const FLOAT_STEP: f32 = 0.5;
const FLOAT_RANGE: f32 = 3.0;

/// A floating coin; no gravity, collected on contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub collected: bool,
    pub anim_frame: u8,
    /// Vertical bob applied when drawing
    pub float_offset: f32,
    #[serde(default)]
    anim_timer: u8,
    #[serde(default = "default_float_dir")]
    float_dir: f32,
}

fn default_float_dir() -> f32 {
    1.0
}

impl Default for Coin {
    fn default() -> Self {
        Self {
            collected: false,
            anim_frame: 0,
            float_offset: 0.0,
            anim_timer: 0,
            float_dir: 1.0,
        }
    }
}

impl Coin {
    pub fn spawn_body(pos: Vec2) -> Body {
        Body::new(pos, Vec2::splat(COIN_SIZE))
    }

    /// Spin and bob
    pub fn advance(&mut self) {
        if self.collected {
            return;
        }

        self.anim_timer += 1;
        if self.anim_timer > COIN_FRAME_TICKS {
            self.anim_frame = (self.anim_frame + 1) % COIN_FRAMES;
            self.anim_timer = 0;
        }

        self.float_offset += self.float_dir * FLOAT_STEP;
        if self.float_offset.abs() > FLOAT_RANGE {
            self.float_dir = -self.float_dir;
        }
    }

    /// Mark collected. Returns false if it already was.
    pub fn collect(&mut self, body: &mut Body) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        body.active = false;
        true
    }
}

/// Power-up that rises out of a question block, then wanders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mushroom {
    pub collected: bool,
    /// Still rising out of its block
    pub spawning: bool,
    /// y at which rising stops
    pub target_y: f32,
}

impl Mushroom {
    /// Mushroom inside the block at `block_pos`, ready to rise above it
    pub fn emerge(block_pos: Vec2, tuning: &Tuning) -> (Self, Body) {
        let mut body = Body::new(block_pos, Vec2::splat(MUSHROOM_SIZE));
        body.vel.x = tuning.item_speed;
        let mushroom = Self {
            collected: false,
            spawning: true,
            target_y: block_pos.y - TILE_SIZE,
        };
        (mushroom, body)
    }

    /// Takes part in gravity and tile collision
    pub fn is_physical(&self) -> bool {
        !self.spawning && !self.collected
    }

    pub fn advance(&mut self, body: &mut Body, grid: &TileGrid, tuning: &Tuning) {
        if self.collected {
            return;
        }

        if self.spawning {
            body.pos.y -= tuning.item_rise_speed;
            if body.pos.y <= self.target_y {
                body.pos.y = self.target_y;
                self.spawning = false;
            }
            return;
        }

        body.apply_gravity(tuning.gravity, tuning.max_fall_speed);
        body.integrate();

        if body.grounded && body.vel.x != 0.0 && should_turn(grid, body, tuning.probe_distance) {
            body.vel.x = -body.vel.x;
        }
    }

    /// Collect unless still rising. Returns true on success.
    pub fn collect(&mut self, body: &mut Body) -> bool {
        if self.collected || self.spawning {
            return false;
        }
        self.collected = true;
        body.active = false;
        true
    }
}
