//! Game state and core simulation types
//!
//! Everything a step reads or writes lives in `GameState`; there is no
//! global state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::ItemKind;
use super::body::Body;
use super::camera::Camera;
use super::enemy::{Enemy, EnemyKind};
use super::grid::TileGrid;
use super::item::{Coin, Mushroom};
use super::player::{Hit, Player};
use crate::consts::KILL_MARGIN;
use crate::level::{LevelLayout, SpawnKind};
use crate::tile_to_px;
use crate::tuning::Tuning;

/// Whether the run is still going
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Playing,
    /// Lives exhausted; steps are no-ops until reset
    GameOver,
}

/// HUD counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub coins: u32,
    pub lives: u32,
    /// Level countdown in seconds
    pub time: i32,
}

impl Scoreboard {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            coins: 0,
            lives: tuning.start_lives,
            time: tuning.start_time,
        }
    }

    /// Count one coin. Returns true if it earned an extra life.
    pub fn add_coin(&mut self, tuning: &Tuning) -> bool {
        self.coins += 1;
        self.score += tuning.score_coin;
        if self.coins >= tuning.coins_per_life {
            self.coins = 0;
            self.lives += 1;
            return true;
        }
        false
    }
}

/// Per-variant actor data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ActorKind {
    Enemy(Enemy),
    Coin(Coin),
    Mushroom(Mushroom),
}

/// A non-player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: u32,
    pub body: Body,
    pub kind: ActorKind,
}

impl Actor {
    /// Takes part in tile collision this step
    pub fn is_physical(&self) -> bool {
        match &self.kind {
            ActorKind::Enemy(enemy) => enemy.is_physical(),
            ActorKind::Coin(_) => false,
            ActorKind::Mushroom(mushroom) => mushroom.is_physical(),
        }
    }
}

/// Why the player lost a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Enemy,
    Fell,
    TimeUp,
}

/// Things that happened during a step, for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    CoinCollected { at: Vec2 },
    ExtraLife,
    BlockBumped { tile: (i32, i32) },
    BlockShattered { tile: (i32, i32) },
    ItemReleased { tile: (i32, i32), item: ItemKind },
    EnemyStomped { id: u32 },
    ShellKicked { id: u32 },
    PoweredUp,
    PowerLost,
    PlayerDied { cause: DeathCause },
    GameOver,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    /// Active non-player entities (sorted by id)
    pub actors: Vec<Actor>,
    pub grid: TileGrid,
    pub camera: Camera,
    pub scoreboard: Scoreboard,
    pub status: RunStatus,
    /// Player start and respawn point
    pub spawn: Vec2,
    /// Simulation step counter
    pub time_ticks: u64,
    /// Events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Build a fresh level from its layout
    pub fn new(layout: &LevelLayout, tuning: &Tuning) -> Self {
        let mut state = Self {
            player: Player::new(layout.player_spawn),
            actors: Vec::with_capacity(layout.spawns.len() + 8),
            grid: layout.build_grid(),
            camera: Camera::default(),
            scoreboard: Scoreboard::new(tuning),
            status: RunStatus::Playing,
            spawn: layout.player_spawn,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };

        for s in &layout.spawns {
            let pos = Vec2::new(tile_to_px(s.x), tile_to_px(s.y));
            let (body, kind) = match s.kind {
                SpawnKind::Walker => (
                    Enemy::spawn_body(EnemyKind::Walker, pos, tuning),
                    ActorKind::Enemy(Enemy::new(EnemyKind::Walker)),
                ),
                SpawnKind::Shelled => (
                    Enemy::spawn_body(EnemyKind::Shelled, pos, tuning),
                    ActorKind::Enemy(Enemy::new(EnemyKind::Shelled)),
                ),
                SpawnKind::Coin => (Coin::spawn_body(pos), ActorKind::Coin(Coin::default())),
            };
            state.spawn_actor(body, kind);
        }

        log::info!(
            "Level {}x{}: {} blocks, {} actors",
            layout.width,
            layout.height,
            state.grid.blocks().len(),
            state.actors.len()
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an actor; returns its ID
    pub fn spawn_actor(&mut self, body: Body, kind: ActorKind) -> u32 {
        let id = self.next_entity_id();
        self.actors.push(Actor { id, body, kind });
        id
    }

    pub fn spawn_mushroom(&mut self, block_pos: Vec2, tuning: &Tuning) -> u32 {
        let (mushroom, body) = Mushroom::emerge(block_pos, tuning);
        self.spawn_actor(body, ActorKind::Mushroom(mushroom))
    }

    pub fn actor(&self, id: u32) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Anything whose top passes this line is gone
    pub fn kill_line(&self) -> f32 {
        self.grid.height_px() + KILL_MARGIN
    }

    pub fn is_over(&self) -> bool {
        self.status == RunStatus::GameOver
    }

    /// Take events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Count a collected coin, granting an extra life at the threshold
    pub fn collect_coin(&mut self, at: Vec2, tuning: &Tuning) {
        self.events.push(GameEvent::CoinCollected { at });
        if self.scoreboard.add_coin(tuning) {
            log::info!("Extra life! lives={}", self.scoreboard.lives);
            self.events.push(GameEvent::ExtraLife);
        }
    }

    /// An enemy touched the player
    pub fn hurt_player(&mut self, tuning: &Tuning) {
        match self.player.take_hit(tuning) {
            Hit::Ignored => {}
            Hit::PowerLost => {
                log::debug!("Player shrank, invulnerable for {} ticks", tuning.invulnerable_ticks);
                self.events.push(GameEvent::PowerLost);
            }
            Hit::Lethal => self.kill_player(DeathCause::Enemy, tuning),
        }
    }

    /// Lose a life: respawn, or end the run when none are left
    pub fn kill_player(&mut self, cause: DeathCause, tuning: &Tuning) {
        if self.is_over() {
            return;
        }

        self.scoreboard.lives = self.scoreboard.lives.saturating_sub(1);
        self.events.push(GameEvent::PlayerDied { cause });

        if self.scoreboard.lives == 0 {
            self.status = RunStatus::GameOver;
            self.events.push(GameEvent::GameOver);
            log::info!("Game over (score {})", self.scoreboard.score);
            return;
        }

        log::info!("Player died ({:?}), {} lives left", cause, self.scoreboard.lives);
        self.player.respawn(self.spawn, tuning);
    }

    /// Drop inactive actors, keeping ID order
    pub fn prune(&mut self) {
        self.actors.retain(|a| a.body.active);
    }

    /// Ensure actors are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.actors.sort_by_key(|a| a.id);
    }
}
