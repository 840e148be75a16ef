//! Tree height statistics for an estate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EstateStats {
    pub count: u64,
    pub max: u32,
    pub min: u32,
    pub median: f64,
}

impl EstateStats {
    /// Summarise tree heights. An estate without trees reports all zeros.
    ///
    /// The median is the continuous 50th percentile: the mean of the two
    /// middle values when the count is even.
    pub fn from_heights(heights: &[u32]) -> Self {
        if heights.is_empty() {
            return Self::default();
        }

        let mut sorted = heights.to_vec();
        sorted.sort_unstable();

        let n = sorted.len();
        let mid = n / 2;
        let median = if n % 2 == 1 {
            f64::from(sorted[mid])
        } else {
            (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
        };

        Self {
            count: n as u64,
            max: sorted[n - 1],
            min: sorted[0],
            median,
        }
    }
}
