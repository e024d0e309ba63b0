//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (demo autopilot)
//! - Stable iteration order (grid insertion order, actors by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod block;
pub mod body;
pub mod camera;
pub mod collision;
pub mod enemy;
pub mod grid;
pub mod item;
pub mod player;
pub mod session;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use block::{Block, BlockKind, BumpOutcome, ItemKind};
pub use body::{Aabb, Body};
pub use camera::Camera;
pub use enemy::{Enemy, EnemyKind, EnemyState};
pub use grid::TileGrid;
pub use item::{Coin, Mushroom};
pub use player::{Facing, Player, PowerLevel};
pub use session::{Session, Snapshot};
pub use state::{Actor, ActorKind, DeathCause, GameEvent, GameState, RunStatus, Scoreboard};
pub use tick::{StepInput, second_elapsed, step};
