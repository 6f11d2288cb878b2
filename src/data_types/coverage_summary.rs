
/// Depth statistics accumulated over one per-base depth file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverageStats {
    /// Number of positions observed
    positions: u64,
    /// Sum of all depths, used for the mean
    depth_sum: u64,
    /// Pairs of (threshold, number of positions with depth strictly greater than threshold)
    threshold_counts: Vec<(u64, u64)>
}

impl CoverageStats {
    /// Creates an empty accumulator for a set of thresholds
    pub fn new(thresholds: &[u64]) -> Self {
        Self {
            positions: 0,
            depth_sum: 0,
            threshold_counts: thresholds.iter().map(|&t| (t, 0)).collect()
        }
    }

    /// Adds a single position's depth
    pub fn add_depth(&mut self, depth: u64) {
        self.positions += 1;
        self.depth_sum += depth;
        for (threshold, count) in self.threshold_counts.iter_mut() {
            if depth > *threshold {
                *count += 1;
            }
        }
    }

    pub fn positions(&self) -> u64 {
        self.positions
    }

    /// Arithmetic mean of the depths, or None if no positions were observed
    pub fn mean_depth(&self) -> Option<f64> {
        if self.positions > 0 {
            Some(self.depth_sum as f64 / self.positions as f64)
        } else {
            None
        }
    }

    /// Number of positions with depth strictly above `threshold`, if that threshold is tracked
    pub fn count_above(&self, threshold: u64) -> Option<u64> {
        self.threshold_counts.iter()
            .find(|(t, _c)| *t == threshold)
            .map(|(_t, c)| *c)
    }

    /// All (threshold, count) pairs in the configured order
    pub fn threshold_counts(&self) -> &[(u64, u64)] {
        &self.threshold_counts
    }
}

impl Extend<u64> for CoverageStats {
    fn extend<T: IntoIterator<Item = u64>>(&mut self, iter: T) {
        for depth in iter {
            self.add_depth(depth);
        }
    }
}

/// Coverage summary for one sample and one depth file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverageSummaryRow {
    /// The sample Run identifier
    pub run: String,
    /// Statistics from the depth file
    pub stats: CoverageStats
}
