//! Estate height map.
//!
//! The estate is materialised as a dense `width x length` grid of hover
//! heights, stored row-major in a single buffer. Row index is `y - 1`, column
//! index is `x - 1`.

use crate::error::PatrolError;
use crate::models::{Estate, Tree};

/// Hover height over bare ground.
pub const GROUND_CLEARANCE: u32 = 1;

/// Dense grid of hover heights, one per estate cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightMap {
    length: u32,
    width: u32,
    cells: Vec<u32>,
}

impl HeightMap {
    /// Create a map where every cell sits at ground clearance.
    pub fn flat(estate: Estate) -> Self {
        let len = estate.length as usize * estate.width as usize;
        Self {
            length: estate.length,
            width: estate.width,
            cells: vec![GROUND_CLEARANCE; len],
        }
    }

    /// Number of columns (X axis).
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Number of rows (Y axis).
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.length as usize + col as usize
    }

    /// Height at a zero-based `(row, col)` cell.
    ///
    /// Panics if the cell is outside the grid.
    #[inline]
    pub fn get(&self, row: u32, col: u32) -> u32 {
        debug_assert!(row < self.width && col < self.length);
        self.cells[self.index(row, col)]
    }

    /// Height at a 1-based estate coordinate, if it lies inside the grid.
    pub fn height_at(&self, x: u32, y: u32) -> Option<u32> {
        if x == 0 || y == 0 || x > self.length || y > self.width {
            return None;
        }
        Some(self.get(y - 1, x - 1))
    }

    fn raise(&mut self, tree: &Tree) -> Result<(), PatrolError> {
        if tree.x == 0 || tree.y == 0 || tree.x > self.length || tree.y > self.width {
            return Err(PatrolError::TreeOutOfBounds {
                x: tree.x,
                y: tree.y,
                length: self.length,
                width: self.width,
            });
        }
        let idx = self.index(tree.y - 1, tree.x - 1);
        self.cells[idx] = tree.height + GROUND_CLEARANCE;
        Ok(())
    }
}

/// Builds height maps from estate layouts.
pub struct GridBuilder;

impl GridBuilder {
    /// Materialise the estate as a height map.
    ///
    /// Each tree raises its cell to `height + 1`. When two trees share a
    /// coordinate the later one wins.
    pub fn build(estate: Option<&Estate>, trees: &[Tree]) -> Result<HeightMap, PatrolError> {
        let estate = estate.ok_or(PatrolError::InvalidInput)?;
        if estate.length == 0 || estate.width == 0 {
            return Err(PatrolError::InvalidInput);
        }

        let mut map = HeightMap::flat(*estate);
        for tree in trees {
            map.raise(tree)?;
        }
        Ok(map)
    }
}
