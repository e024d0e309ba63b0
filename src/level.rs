//! Level layout data
//!
//! A level is pure data: block descriptors and spawn descriptors in tile
//! coordinates. Layouts load from JSON or are assembled with the builder
//! helpers; `LevelLayout::sample()` is the bundled 200-tile course.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::sim::block::{Block, BlockKind, ItemKind};
use crate::sim::grid::TileGrid;

/// One block of the layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub kind: BlockKind,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub item: Option<ItemKind>,
}

/// Actors placed at level start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    Walker,
    Shelled,
    Coin,
}

/// One actor of the layout (tile coordinates of its top-left corner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnDescriptor {
    pub kind: SpawnKind,
    pub x: i32,
    pub y: i32,
}

fn default_player_spawn() -> Vec2 {
    Vec2::new(100.0, 100.0)
}

/// Complete description of a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Width in tiles
    pub width: i32,
    /// Height in tiles
    pub height: i32,
    /// Player start and respawn point (pixels)
    #[serde(default = "default_player_spawn")]
    pub player_spawn: Vec2,
    pub blocks: Vec<BlockDescriptor>,
    #[serde(default)]
    pub spawns: Vec<SpawnDescriptor>,
}

impl LevelLayout {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            player_spawn: default_player_spawn(),
            blocks: Vec::new(),
            spawns: Vec::new(),
        }
    }

    /// Parse and validate a layout from JSON
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let layout: LevelLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn block(&mut self, kind: BlockKind, x: i32, y: i32) -> &mut Self {
        self.blocks.push(BlockDescriptor {
            kind,
            x,
            y,
            item: None,
        });
        self
    }

    pub fn question(&mut self, x: i32, y: i32, item: ItemKind) -> &mut Self {
        self.blocks.push(BlockDescriptor {
            kind: BlockKind::Question,
            x,
            y,
            item: Some(item),
        });
        self
    }

    /// Solid ground from row `top` to the bottom of the level, full width
    pub fn ground(&mut self, top: i32) -> &mut Self {
        for x in 0..self.width {
            for y in top..self.height {
                self.block(BlockKind::Ground, x, y);
            }
        }
        self
    }

    /// Horizontal run of `length` blocks starting at (`start_x`, `y`)
    pub fn platform(&mut self, start_x: i32, y: i32, length: i32, kind: BlockKind) -> &mut Self {
        for i in 0..length {
            self.block(kind, start_x + i, y);
        }
        self
    }

    /// Ascending staircase: column `i` is `i + 1` blocks tall, resting on `start_y`
    pub fn stairs(&mut self, start_x: i32, start_y: i32, height: i32, kind: BlockKind) -> &mut Self {
        for i in 0..height {
            for j in 0..=i {
                self.block(kind, start_x + i, start_y - j);
            }
        }
        self
    }

    pub fn spawn(&mut self, kind: SpawnKind, x: i32, y: i32) -> &mut Self {
        self.spawns.push(SpawnDescriptor { kind, x, y });
        self
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Check the layout can be simulated
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(LoadError::EmptyLevel {
                width: self.width,
                height: self.height,
            });
        }

        let mut occupied = HashSet::new();
        for b in &self.blocks {
            if !self.in_bounds(b.x, b.y) {
                return Err(LoadError::OutOfBounds {
                    what: "block",
                    x: b.x,
                    y: b.y,
                });
            }
            if b.kind.is_solid() && !occupied.insert((b.x, b.y)) {
                return Err(LoadError::DuplicateBlock { x: b.x, y: b.y });
            }
            if b.item.is_some() && b.kind != BlockKind::Question {
                log::warn!(
                    "{:?} block at ({}, {}) holds an item it can never release",
                    b.kind,
                    b.x,
                    b.y
                );
            }
        }

        for s in &self.spawns {
            if !self.in_bounds(s.x, s.y) {
                return Err(LoadError::OutOfBounds {
                    what: "spawn",
                    x: s.x,
                    y: s.y,
                });
            }
        }

        Ok(())
    }

    /// Build the tile grid in descriptor order
    pub fn build_grid(&self) -> TileGrid {
        let mut grid = TileGrid::new(self.width, self.height);
        for b in &self.blocks {
            grid.push(Block::new(b.x, b.y, b.kind, b.item));
        }
        grid
    }

    /// The bundled 200x15 course
    pub fn sample() -> Self {
        use BlockKind::Brick;
        use ItemKind::{Coin, Mushroom};

        let mut level = LevelLayout::new(200, 15);
        level.ground(13);

        level
            .platform(20, 10, 3, Brick)
            .platform(30, 10, 3, Brick)
            .platform(40, 8, 5, Brick);

        level
            .question(16, 9, Coin)
            .question(21, 9, Mushroom)
            .question(23, 9, Coin)
            .question(25, 5, Coin)
            .question(31, 9, Mushroom)
            .question(51, 9, Coin)
            .question(70, 9, Mushroom)
            .question(80, 5, Coin);

        level
            .platform(50, 10, 8, Brick)
            .platform(65, 8, 4, Brick)
            .platform(75, 6, 3, Brick)
            .platform(90, 10, 10, Brick);

        // Floating question row
        level
            .question(45, 6, Coin)
            .question(46, 6, Coin)
            .question(47, 6, Coin);

        level.stairs(110, 12, 8, Brick).stairs(130, 12, 6, Brick);

        // Final platform
        level.platform(150, 10, 15, Brick);

        for (x, y) in [(18, 8), (48, 4), (55, 7), (68, 5), (95, 8)] {
            level.spawn(SpawnKind::Coin, x, y);
        }

        for (kind, x) in [
            (SpawnKind::Walker, 25),
            (SpawnKind::Walker, 35),
            (SpawnKind::Shelled, 45),
            (SpawnKind::Walker, 55),
            (SpawnKind::Walker, 60),
            (SpawnKind::Shelled, 72),
            (SpawnKind::Walker, 85),
            (SpawnKind::Shelled, 95),
            (SpawnKind::Walker, 105),
            (SpawnKind::Walker, 115),
            (SpawnKind::Shelled, 125),
            (SpawnKind::Walker, 140),
            (SpawnKind::Shelled, 155),
        ] {
            level.spawn(kind, x, 11);
        }

        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_valid() {
        let level = LevelLayout::sample();
        assert!(level.validate().is_ok());
        assert_eq!(level.spawns.len(), 18);
        // Two ground rows across the whole level
        let ground = level
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Ground)
            .count();
        assert_eq!(ground, 400);
    }

    #[test]
    fn test_stairs_shape() {
        let mut level = LevelLayout::new(20, 15);
        level.stairs(2, 12, 3, BlockKind::Brick);
        assert_eq!(level.blocks.len(), 6);
        assert!(level.blocks.iter().any(|b| b.x == 4 && b.y == 10));
        assert!(!level.blocks.iter().any(|b| b.x == 2 && b.y == 11));
    }

    #[test]
    fn test_duplicate_solid_block_rejected() {
        let mut level = LevelLayout::new(10, 15);
        level.block(BlockKind::Brick, 3, 3).block(BlockKind::Ground, 3, 3);
        assert!(matches!(
            level.validate(),
            Err(LoadError::DuplicateBlock { x: 3, y: 3 })
        ));
    }

    #[test]
    fn test_destroyed_placeholder_may_share_cell() {
        let mut level = LevelLayout::new(10, 15);
        level
            .block(BlockKind::Destroyed, 3, 3)
            .block(BlockKind::Brick, 3, 3);
        assert!(level.validate().is_ok());
        let grid = level.build_grid();
        assert_eq!(grid.tile_type_at(100.0, 100.0), Some(BlockKind::Brick));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut level = LevelLayout::new(10, 15);
        level.spawn(SpawnKind::Walker, 10, 3);
        assert!(matches!(
            level.validate(),
            Err(LoadError::OutOfBounds { what: "spawn", .. })
        ));
    }

    #[test]
    fn test_empty_level_rejected() {
        assert!(matches!(
            LevelLayout::new(0, 15).validate(),
            Err(LoadError::EmptyLevel { .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"{
            "width": 8,
            "height": 15,
            "blocks": [
                { "kind": "ground", "x": 0, "y": 13 },
                { "kind": "question", "x": 3, "y": 9, "item": "mushroom" }
            ],
            "spawns": [ { "kind": "walker", "x": 5, "y": 11 } ]
        }"#;
        let level = LevelLayout::from_json(json).unwrap();
        assert_eq!(level.player_spawn, Vec2::new(100.0, 100.0));
        assert_eq!(level.blocks[1].item, Some(ItemKind::Mushroom));

        let again = LevelLayout::from_json(&level.to_json().unwrap()).unwrap();
        assert_eq!(again, level);
    }
}
