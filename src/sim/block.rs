//! Tile blocks and their impact state machine
//!
//! Ground never changes. A question block is struck exactly once and releases
//! its item. A brick shatters only under a powered-up player; every other hit
//! is a thud that just jolts the block.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Aabb;
use super::player::PowerLevel;
use crate::consts::TILE_SIZE;
use crate::tile_to_px;
use crate::tuning::Tuning;

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Ground,
    Brick,
    Question,
    /// Inert placeholder left by a shattered brick
    Destroyed,
}

impl BlockKind {
    /// Destroyed blocks take no part in collision or lookups
    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockKind::Destroyed
    }
}

/// Item held by a question block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Coin,
    Mushroom,
}

/// What a bump did to the block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpOutcome {
    /// Question block struck for the first time
    Released(Option<ItemKind>),
    /// Brick broken by a powered-up player
    Shattered,
    /// No state change
    Thud,
}

/// Question block color cycle length
const QUESTION_FRAMES: u8 = 3;
/// Steps each question block frame is held (advances once the timer passes 15)
const QUESTION_FRAME_TICKS: u8 = 15;

/// A single tile of the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub tile_x: i32,
    pub tile_y: i32,
    pub kind: BlockKind,
    pub item: Option<ItemKind>,
    /// Question block already used
    pub struck: bool,
    /// Transient upward displacement after a hit (pixels, decays to 0)
    pub bump_offset: f32,
    pub anim_frame: u8,
    #[serde(default)]
    anim_timer: u8,
}

impl Block {
    pub fn new(tile_x: i32, tile_y: i32, kind: BlockKind, item: Option<ItemKind>) -> Self {
        Self {
            tile_x,
            tile_y,
            kind,
            item,
            struck: false,
            bump_offset: 0.0,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    /// Pixel position of the top-left corner (undisplaced)
    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(tile_to_px(self.tile_x), tile_to_px(self.tile_y))
    }

    /// Resting box
    pub fn aabb(&self) -> Aabb {
        let pos = self.pos();
        Aabb::new(pos.x, pos.y, TILE_SIZE, TILE_SIZE)
    }

    /// Box lifted by the current bump offset
    pub fn bumped_aabb(&self) -> Aabb {
        let pos = self.pos();
        Aabb::new(pos.x, pos.y - self.bump_offset, TILE_SIZE, TILE_SIZE)
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }

    /// Per-step bump decay and question-block shimmer
    pub fn animate(&mut self, decay: f32) {
        if self.bump_offset > 0.0 {
            self.bump_offset = (self.bump_offset - decay).max(0.0);
        }

        if self.kind == BlockKind::Question && !self.struck {
            self.anim_timer += 1;
            if self.anim_timer > QUESTION_FRAME_TICKS {
                self.anim_frame = (self.anim_frame + 1) % QUESTION_FRAMES;
                self.anim_timer = 0;
            }
        }
    }

    /// Apply an impact from below by a player at the given power level
    pub fn bump(&mut self, power: PowerLevel, tuning: &Tuning) -> BumpOutcome {
        match self.kind {
            BlockKind::Question if !self.struck => {
                self.struck = true;
                self.bump_offset = tuning.bump_offset_struck;
                BumpOutcome::Released(self.item)
            }
            BlockKind::Brick if power != PowerLevel::Small => {
                self.kind = BlockKind::Destroyed;
                BumpOutcome::Shattered
            }
            _ => {
                self.bump_offset = tuning.bump_offset_thud;
                BumpOutcome::Thud
            }
        }
    }
}
