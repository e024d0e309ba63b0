//! Tile Dash - A tile-based side-scrolling platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, state machines)
//! - `level`: Level layout data and the bundled sample level
//! - `tuning`: Data-driven physics and scoring balance
//! - `error`: Load errors for layout/tuning data

pub mod error;
pub mod level;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::LoadError;
pub use level::LevelLayout;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Edge length of one tile in pixels
    pub const TILE_SIZE: f32 = 32.0;

    /// Fixed simulation rate (one step per display frame)
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_DT_MS: f64 = 1000.0 / SIM_HZ as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport dimensions the camera clamps against
    pub const VIEW_WIDTH: f32 = 1024.0;
    pub const VIEW_HEIGHT: f32 = 480.0;

    /// How far below the level bottom an actor may fall before it is gone
    pub const KILL_MARGIN: f32 = 100.0;
}

/// Tile cell index containing a pixel coordinate
#[inline]
pub fn tile_of(px: f32) -> i32 {
    (px / consts::TILE_SIZE).floor() as i32
}

/// Pixel coordinate of a tile cell's top-left edge
#[inline]
pub fn tile_to_px(tile: i32) -> f32 {
    tile as f32 * consts::TILE_SIZE
}
