//! Estate layout files and random planting.

use anyhow::{Context, Result};
use patrol_core::{Estate, EstateLayout, Tree, MAX_ESTATE_SIDE, MAX_TREE_HEIGHT};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;

/// Read an estate layout from a JSON file.
///
/// Expected shape: `{"length": 5, "width": 1, "trees": [{"x": 5, "y": 1, "height": 5}]}`.
pub fn read_layout(path: &Path) -> Result<EstateLayout> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout {}", path.display()))?;
    let layout: EstateLayout = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse layout {}", path.display()))?;
    Ok(layout)
}

/// Largest `length * width` planned by default, matching the server.
pub const DEFAULT_MAX_CELLS: u64 = 25_000_000;

/// Reject layouts the planner should not allocate a grid for.
///
/// Both sides must lie in `1..=MAX_ESTATE_SIDE` and the cell count must not
/// exceed `max_cells`.
pub fn check_layout(layout: &EstateLayout, max_cells: u64) -> Result<()> {
    let Estate { length, width } = layout.estate;
    let sides = 1..=MAX_ESTATE_SIDE;
    if !sides.contains(&length) || !sides.contains(&width) {
        anyhow::bail!(
            "Estate {}x{} is outside the supported range 1..={} per side",
            length,
            width,
            MAX_ESTATE_SIDE
        );
    }
    let area = layout.estate.area();
    if area > max_cells {
        anyhow::bail!(
            "Estate {}x{} has {} cells, above the limit of {}",
            length,
            width,
            area,
            max_cells
        );
    }
    Ok(())
}

/// Pick up to `count` distinct cells on the estate and give each a random
/// height in `1..=MAX_TREE_HEIGHT`.
pub fn random_trees<R: Rng>(rng: &mut R, estate: Estate, count: usize) -> Vec<Tree> {
    let area = usize::try_from(estate.area()).unwrap_or(usize::MAX);
    let count = count.min(area);

    let cells: Vec<(u32, u32)> = if count.saturating_mul(4) >= area {
        // Dense: shuffle every cell.
        let mut all: Vec<(u32, u32)> = (1..=estate.width)
            .flat_map(|y| (1..=estate.length).map(move |x| (x, y)))
            .collect();
        all.shuffle(rng);
        all.truncate(count);
        all
    } else {
        let mut seen = HashSet::with_capacity(count);
        let mut picked = Vec::with_capacity(count);
        while picked.len() < count {
            let cell = (
                rng.random_range(1..=estate.length),
                rng.random_range(1..=estate.width),
            );
            if seen.insert(cell) {
                picked.push(cell);
            }
        }
        picked
    };

    cells
        .into_iter()
        .map(|(x, y)| Tree::new(x, y, rng.random_range(1..=MAX_TREE_HEIGHT)))
        .collect()
}
