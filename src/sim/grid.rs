//! Block field
//!
//! A fixed `columns x rows` arrangement of destructible cells. Destroyed cells
//! are marked first and swept on the next tick, so the collision that broke a
//! cell can still read it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::GameConfig;
use crate::consts::{BLOCK_REROLL_ODDS, POINTS_PER_RANK};

/// Block types, ordered by rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockCategory {
    #[default]
    Common,
    Sticky,
    Resistant,
}

impl BlockCategory {
    pub const ALL: [BlockCategory; 3] = [Self::Common, Self::Sticky, Self::Resistant];

    pub fn rank(self) -> u64 {
        match self {
            Self::Common => 0,
            Self::Sticky => 1,
            Self::Resistant => 2,
        }
    }

    /// Points awarded for destroying a block of this category
    pub fn reward(self) -> u64 {
        (self.rank() + 1) * POINTS_PER_RANK
    }

    pub fn base_health(self) -> i32 {
        match self {
            Self::Common | Self::Sticky => 1,
            Self::Resistant => 2,
        }
    }

    /// Speed change applied to a ball that hits this block
    pub fn drag(self) -> i32 {
        match self {
            Self::Common => 1,
            Self::Sticky => -2,
            Self::Resistant => 0,
        }
    }

    /// Category a row gets before any re-roll
    pub fn for_row(row: usize, rows: usize) -> Self {
        if row < rows / 4 {
            Self::Resistant
        } else if row < rows / 2 {
            Self::Sticky
        } else {
            Self::Common
        }
    }
}

/// A block entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub col: usize,
    pub row: usize,
    pub category: BlockCategory,
    pub health: i32,
    pub drag: i32,
    /// Number of hits taken; each one brightens the block
    pub hits_taken: u32,
}

impl Block {
    pub fn new(category: BlockCategory, col: usize, row: usize) -> Self {
        Self {
            col,
            row,
            category,
            health: category.base_health(),
            drag: category.drag(),
            hits_taken: 0,
        }
    }

    /// Destroyed and waiting for the sweep
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// Screen rectangle of this cell
    pub fn rect(&self, config: &GameConfig) -> Rect {
        Rect::new(
            config.side + self.col as f32 * config.tile_width,
            config.side + self.row as f32 * config.tile_height,
            config.tile_width,
            config.tile_height,
        )
    }
}

/// The block field, stored column-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Option<Block>>,
}

impl Grid {
    /// A grid with no blocks
    pub fn empty(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![None; columns * rows],
        }
    }

    /// Fill every cell, banding categories by row with random overrides
    pub fn generate(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let mut grid = Self::empty(config.columns, config.rows);
        for col in 0..config.columns {
            for row in 0..config.rows {
                let mut category = BlockCategory::for_row(row, config.rows);
                if rng.random_ratio(1, BLOCK_REROLL_ODDS) {
                    category = BlockCategory::ALL[rng.random_range(0..BlockCategory::ALL.len())];
                }
                grid.place(Block::new(category, col, row));
            }
        }
        log::debug!("Generated {}x{} block field", config.columns, config.rows);
        grid
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.columns && row < self.rows).then_some(col * self.rows + row)
    }

    /// Put a block at its own coordinates, replacing whatever was there
    pub fn place(&mut self, block: Block) {
        if let Some(i) = self.index(block.col, block.row) {
            self.cells[i] = Some(block);
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Block> {
        self.index(col, row).and_then(|i| self.cells[i].as_ref())
    }

    /// Map a screen position to the block under it, if any.
    ///
    /// Indices truncate toward zero, so a point less than one tile left of or
    /// above the field still maps to the first column or row. That is the
    /// only way a ball center can sit outside the cell it hits.
    pub fn cell_at(&self, config: &GameConfig, x: f32, y: f32) -> Option<&Block> {
        let col = ((x - config.side) / config.tile_width).trunc();
        let row = ((y - config.side) / config.tile_height).trunc();
        // -0.0 passes: it is the first column or row
        if col < 0.0 || row < 0.0 {
            return None;
        }
        self.get(col as usize, row as usize)
    }

    /// Damage a block. Returns its reward on the hit that destroys it, else 0.
    pub fn apply_damage(&mut self, col: usize, row: usize, amount: i32) -> u64 {
        let Some(block) = self.index(col, row).and_then(|i| self.cells[i].as_mut()) else {
            return 0;
        };
        let was_alive = !block.is_destroyed();
        block.health -= amount;
        block.hits_taken += 1;
        if was_alive && block.is_destroyed() {
            block.category.reward()
        } else {
            0
        }
    }

    /// Remove destroyed blocks. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let mut removed = 0;
        for cell in &mut self.cells {
            if cell.as_ref().is_some_and(Block::is_destroyed) {
                *cell = None;
                removed += 1;
            }
        }
        removed
    }

    /// Blocks still on the field (including ones awaiting the sweep)
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.cells.iter().flatten()
    }

    /// Number of blocks not yet destroyed
    pub fn remaining(&self) -> usize {
        self.blocks().filter(|b| !b.is_destroyed()).count()
    }
}
