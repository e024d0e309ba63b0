//! Tile grid: the level's blocks and lookups by pixel coordinate
//!
//! Blocks keep their insertion order, which is also the order collision
//! resolution visits them in. A cell index makes lookups O(1); results are
//! the same as scanning the list for the first solid block in the cell.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::block::{Block, BlockKind};
use super::body::Aabb;
use crate::{tile_of, tile_to_px};

/// Serialized form (the index is rebuilt on load)
#[derive(Serialize, Deserialize)]
struct GridRepr {
    width: i32,
    height: i32,
    blocks: Vec<Block>,
}

/// Level blocks with a cell index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "GridRepr", into = "GridRepr")]
pub struct TileGrid {
    /// Width in tiles
    width: i32,
    /// Height in tiles
    height: i32,
    blocks: Vec<Block>,
    /// First solid block per cell
    index: HashMap<(i32, i32), usize>,
}

impl From<GridRepr> for TileGrid {
    fn from(repr: GridRepr) -> Self {
        let mut grid = TileGrid::new(repr.width, repr.height);
        for block in repr.blocks {
            grid.push(block);
        }
        grid
    }
}

impl From<TileGrid> for GridRepr {
    fn from(grid: TileGrid) -> Self {
        GridRepr {
            width: grid.width,
            height: grid.height,
            blocks: grid.blocks,
        }
    }
}

impl TileGrid {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            blocks: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Append a block; the first solid block in a cell wins lookups
    pub fn push(&mut self, block: Block) {
        let idx = self.blocks.len();
        if block.is_solid() {
            self.index.entry((block.tile_x, block.tile_y)).or_insert(idx);
        }
        self.blocks.push(block);
    }

    /// Width in tiles
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn width_px(&self) -> f32 {
        tile_to_px(self.width)
    }

    pub fn height_px(&self) -> f32 {
        tile_to_px(self.height)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, idx: usize) -> &Block {
        &self.blocks[idx]
    }

    pub fn block_mut(&mut self, idx: usize) -> &mut Block {
        &mut self.blocks[idx]
    }

    /// Advance every block's animation
    pub fn animate(&mut self, bump_decay: f32) {
        for block in &mut self.blocks {
            block.animate(bump_decay);
        }
    }

    fn cell_index(&self, tx: i32, ty: i32) -> Option<usize> {
        self.index
            .get(&(tx, ty))
            .copied()
            .filter(|&idx| self.blocks[idx].is_solid())
    }

    /// Whether a solid block occupies the tile cell
    pub fn is_solid_cell(&self, tx: i32, ty: i32) -> bool {
        self.cell_index(tx, ty).is_some()
    }

    /// Type of the solid block whose cell contains the point
    pub fn tile_type_at(&self, px: f32, py: f32) -> Option<BlockKind> {
        self.block_at(px, py).map(|b| b.kind)
    }

    /// The solid block whose cell contains the point
    pub fn block_at(&self, px: f32, py: f32) -> Option<&Block> {
        self.cell_index(tile_of(px), tile_of(py))
            .map(|idx| &self.blocks[idx])
    }

    pub fn block_at_mut(&mut self, px: f32, py: f32) -> Option<&mut Block> {
        self.cell_index(tile_of(px), tile_of(py))
            .map(|idx| &mut self.blocks[idx])
    }

    /// Indices of solid blocks in cells touched by `area`, in grid order
    pub fn candidates(&self, area: &Aabb) -> Vec<usize> {
        let mut found = Vec::new();
        for ty in tile_of(area.top())..=tile_of(area.bottom()) {
            for tx in tile_of(area.left())..=tile_of(area.right()) {
                if let Some(idx) = self.cell_index(tx, ty) {
                    found.push(idx);
                }
            }
        }
        found.sort_unstable();
        found
    }
}
