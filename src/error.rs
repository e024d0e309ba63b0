//! Errors raised while loading level layouts and tuning data
//!
//! The simulation itself never fails; only data coming from outside does.

use thiserror::Error;

/// Errors that can occur when loading or validating external data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("level must be at least one tile wide and tall (got {width}x{height})")]
    EmptyLevel { width: i32, height: i32 },

    #[error("two solid blocks share tile ({x}, {y})")]
    DuplicateBlock { x: i32, y: i32 },

    #[error("{what} at tile ({x}, {y}) lies outside the level")]
    OutOfBounds { what: &'static str, x: i32, y: i32 },

    #[error("tuning value `{field}` must be positive (got {value})")]
    InvalidTuning { field: &'static str, value: f32 },
}
