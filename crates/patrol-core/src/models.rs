//! Core data models for the patrol system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest accepted estate side, in grid cells.
pub const MAX_ESTATE_SIDE: u32 = 50_000;
/// Tallest tree the API accepts.
pub const MAX_TREE_HEIGHT: u32 = 30;

/// Rectangular estate dimensions.
///
/// `length` runs along the X axis (columns), `width` along the Y axis (rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estate {
    pub length: u32,
    pub width: u32,
}

impl Estate {
    pub fn new(length: u32, width: u32) -> Self {
        Self { length, width }
    }

    /// Number of cells in the estate.
    pub fn area(&self) -> u64 {
        u64::from(self.length) * u64::from(self.width)
    }

    /// Check whether a 1-based coordinate lies inside the estate.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (1..=self.length).contains(&x) && (1..=self.width).contains(&y)
    }
}

/// A tree placement on the estate grid (1-based coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub x: u32,
    pub y: u32,
    pub height: u32,
}

impl Tree {
    pub fn new(x: u32, y: u32, height: u32) -> Self {
        Self { x, y, height }
    }
}

/// An estate together with every tree planted on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstateLayout {
    #[serde(flatten)]
    pub estate: Estate,
    #[serde(default)]
    pub trees: Vec<Tree>,
}

impl EstateLayout {
    pub fn new(estate: Estate, trees: Vec<Tree>) -> Self {
        Self { estate, trees }
    }
}

/// A persisted estate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstateRecord {
    pub id: String,
    pub length: u32,
    pub width: u32,
    pub created_at: DateTime<Utc>,
}

impl EstateRecord {
    pub fn dimensions(&self) -> Estate {
        Estate::new(self.length, self.width)
    }
}

/// A persisted tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeRecord {
    pub id: String,
    pub estate_id: String,
    pub x: u32,
    pub y: u32,
    pub height: u32,
    pub created_at: DateTime<Utc>,
}

impl TreeRecord {
    pub fn placement(&self) -> Tree {
        Tree::new(self.x, self.y, self.height)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEstateRequest {
    pub length: u32,
    pub width: u32,
}

impl CreateEstateRequest {
    /// Validate the dimensions against the accepted range.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("length", self.length), ("width", self.width)] {
            if !(1..=MAX_ESTATE_SIDE).contains(&value) {
                return Err(format!("{} must be between 1 and {}", name, MAX_ESTATE_SIDE));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTreeRequest {
    pub x: u32,
    pub y: u32,
    pub height: u32,
}

impl CreateTreeRequest {
    /// Validate the field ranges. Estate bounds are checked separately once the
    /// estate has been loaded.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("x", self.x), ("y", self.y)] {
            if !(1..=MAX_ESTATE_SIDE).contains(&value) {
                return Err(format!("{} must be between 1 and {}", name, MAX_ESTATE_SIDE));
            }
        }
        if !(1..=MAX_TREE_HEIGHT).contains(&self.height) {
            return Err(format!("height must be between 1 and {}", MAX_TREE_HEIGHT));
        }
        Ok(())
    }

    pub fn placement(&self) -> Tree {
        Tree::new(self.x, self.y, self.height)
    }
}
