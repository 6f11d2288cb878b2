
use anyhow::ensure;
use serde::Serialize;

/// An inclusive range of 1-based genomic coordinates; i.e., `min <= POS <= max`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PositionRange {
    /// First included coordinate
    min: u64,
    /// Last included coordinate
    max: u64
}

impl PositionRange {
    /// Constructor
    /// # Errors
    /// * if `min > max`
    pub fn new(min: u64, max: u64) -> anyhow::Result<Self> {
        ensure!(min <= max, "Range minimum ({min}) must be <= maximum ({max})");
        Ok(Self { min, max })
    }

    /// Returns true if the position is inside the range, both ends included
    pub fn contains(&self, position: u64) -> bool {
        self.min <= position && position <= self.max
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }
}

impl std::fmt::Display for PositionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}
