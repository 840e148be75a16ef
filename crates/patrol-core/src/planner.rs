//! Serpentine patrol-distance planner.
//!
//! The patrol unit takes off from the first cell of the estate, sweeps every
//! row in alternating direction (boustrophedon) and lands on the last cell.
//! Horizontal travel costs `scale_factor` per cell move. Vertical travel is the
//! climb or descent between consecutive hover heights, plus the initial
//! takeoff from ground and the final landing.
//!
//! An optional budget stops the sweep at the last cell the unit can reach
//! while still having enough distance left to hover there.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PatrolError;
use crate::grid::{GridBuilder, HeightMap};
use crate::models::EstateLayout;

/// Default distance units per horizontal cell move.
pub const DEFAULT_SCALE_FACTOR: u32 = 10;

/// How a planning call terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOutcome {
    /// Every cell was visited and the unit landed.
    Completed,
    /// The budget ran out before the sweep finished.
    BudgetExceeded,
}

/// Result of one planning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningResult {
    pub total_distance: u64,
    pub horizontal_distance: u64,
    pub vertical_distance: u64,
    /// 1-based X of the last cell reached, 0 if none was affordable.
    pub last_x: u32,
    /// 1-based Y of the last cell reached, 0 if none was affordable.
    pub last_y: u32,
    pub cells_visited: u64,
    pub outcome: PlanOutcome,
}

impl PlanningResult {
    pub fn is_complete(&self) -> bool {
        self.outcome == PlanOutcome::Completed
    }
}

/// Running totals for a single sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistanceAccumulator {
    pub horizontal: u64,
    pub vertical: u64,
    /// Last reached cell as a 1-based `(x, y)`.
    pub last: Option<(u32, u32)>,
    pub cells_visited: u64,
}

impl DistanceAccumulator {
    pub fn total(&self) -> u64 {
        self.horizontal + self.vertical
    }

    fn finish(self, outcome: PlanOutcome) -> PlanningResult {
        let (last_x, last_y) = self.last.unwrap_or((0, 0));
        PlanningResult {
            total_distance: self.total(),
            horizontal_distance: self.horizontal,
            vertical_distance: self.vertical,
            last_x,
            last_y,
            cells_visited: self.cells_visited,
            outcome,
        }
    }
}

/// Iterator over zero-based `(row, col)` cells in serpentine order.
///
/// Even rows run left to right, odd rows right to left, so the first cell of
/// each row sits directly above the last cell of the previous one.
#[derive(Debug, Clone)]
pub struct SerpentineWalk {
    length: u32,
    width: u32,
    row: u32,
    step: u32,
}

impl SerpentineWalk {
    pub fn new(length: u32, width: u32) -> Self {
        Self {
            length,
            width,
            row: 0,
            step: 0,
        }
    }

    fn remaining(&self) -> usize {
        if self.length == 0 || self.row >= self.width {
            return 0;
        }
        let rows_after = (self.width - self.row - 1) as usize;
        rows_after * self.length as usize + (self.length - self.step) as usize
    }
}

impl Iterator for SerpentineWalk {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.length == 0 || self.row >= self.width {
            return None;
        }
        let col = if self.row % 2 == 0 {
            self.step
        } else {
            self.length - 1 - self.step
        };
        let cell = (self.row, col);

        self.step += 1;
        if self.step == self.length {
            self.step = 0;
            self.row += 1;
        }
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for SerpentineWalk {}

/// Walks a height map in serpentine order and accounts travel distance.
#[derive(Debug, Clone, Copy)]
pub struct SerpentinePlanner {
    scale_factor: u32,
}

impl SerpentinePlanner {
    pub fn new(scale_factor: u32) -> Self {
        Self { scale_factor }
    }

    /// Plan a full sweep of `map`, optionally capped at `max_distance`.
    pub fn plan(&self, map: &HeightMap, max_distance: Option<u64>) -> PlanningResult {
        match max_distance {
            Some(budget) => debug!(budget, "planning patrol reach within budget"),
            None => debug!("planning full patrol distance"),
        }

        let scale = u64::from(self.scale_factor);
        let walk = SerpentineWalk::new(map.length(), map.width());
        let last_index = walk.len().saturating_sub(1);

        let mut acc = DistanceAccumulator::default();
        let mut previous: Option<u64> = None;

        for (index, (row, col)) in walk.enumerate() {
            let current = u64::from(map.get(row, col));

            let mut next = acc;
            match previous {
                Some(prev) => {
                    next.horizontal += scale;
                    next.vertical += current.abs_diff(prev);
                }
                // Takeoff from ground to the first hover height.
                None => next.vertical += current,
            }

            if let Some(budget) = max_distance {
                if next.total() + current > budget {
                    debug!(
                        budget,
                        reached = acc.cells_visited,
                        x = col + 1,
                        y = row + 1,
                        "patrol budget exhausted"
                    );
                    return acc.finish(PlanOutcome::BudgetExceeded);
                }
            }

            next.last = Some((col + 1, row + 1));
            next.cells_visited += 1;
            if index == last_index {
                // Landing from the final hover height.
                next.vertical += current;
            }

            acc = next;
            previous = Some(current);
        }

        let result = acc.finish(PlanOutcome::Completed);
        debug!(total = result.total_distance, "patrol sweep completed");
        result
    }
}

/// Build the height map for `layout` and plan its patrol.
///
/// Returns [`PatrolError::InvalidInput`] when no layout is supplied.
pub fn calculate_patrol_distance(
    layout: Option<&EstateLayout>,
    scale_factor: u32,
    max_distance: Option<u64>,
) -> Result<PlanningResult, PatrolError> {
    let layout = layout.ok_or(PatrolError::InvalidInput)?;
    let map = GridBuilder::build(Some(&layout.estate), &layout.trees)?;
    Ok(SerpentinePlanner::new(scale_factor).plan(&map, max_distance))
}
