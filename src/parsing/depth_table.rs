
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use crate::data_types::coverage_summary::CoverageStats;

/// One line of a per-base depth table; tab-separated, no header
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DepthSample {
    /// Reference sequence name
    pub reference: String,
    /// 1-based position
    pub position: u64,
    /// Number of reads covering the position
    pub depth: u64
}

/// Streams a depth table from a reader into coverage statistics; rows are not retained.
/// # Arguments
/// * `reader` - the depth table content
/// * `thresholds` - depth thresholds to count positions above
/// * `source` - path used in messages
/// # Errors
/// * if any row does not have three columns or the numbers do not parse
pub fn summarize_depth_reader<R: std::io::Read>(reader: R, thresholds: &[u64], source: &Path) -> anyhow::Result<CoverageStats> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false) // no headers in the file, disable so we do not skip first row
        .from_reader(reader);

    let mut stats = CoverageStats::new(thresholds);
    for (i, result) in csv_reader.deserialize().enumerate() {
        let sample: DepthSample = result
            .with_context(|| format!("Error while parsing line {} of {source:?}:", i + 1))?;
        stats.add_depth(sample.depth);
    }
    Ok(stats)
}

/// Opens a depth table and summarizes it, see `summarize_depth_reader(...)`
pub fn summarize_depth_file(filename: &Path, thresholds: &[u64]) -> anyhow::Result<CoverageStats> {
    let file = std::fs::File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    summarize_depth_reader(file, thresholds, filename)
}
