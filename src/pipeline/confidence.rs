
use anyhow::Context;
use indicatif::ParallelProgressIterator;
use log::{debug, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::confidence_scorer::{score_file, ScoringConfig};
use crate::data_types::dataset::DatasetLayout;
use crate::data_types::outcome::UnitReport;
use crate::data_types::pipeline_error::PipelineError;
use crate::data_types::position_range::PositionRange;
use crate::pipeline::unit_label;
use crate::util::file_discovery::{find_matching_files, sample_stem};
use crate::util::progress_bar::get_progress_style;

/// Output file for a converted table; e.g. `SRR001.csv` -> `{output_dir}/SRR001_confidence.csv`
pub fn confidence_path_for(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{stem}_confidence.csv"))
}

/// Scores one converted table, skipping it if the output already exists
fn score_unit(input_fn: &Path, output_fn: &Path, range: PositionRange, config: &ScoringConfig) -> anyhow::Result<String> {
    if output_fn.exists() {
        return Err(PipelineError::OutputExists { path: output_fn.to_path_buf() }.into());
    }
    let scored = score_file(input_fn, output_fn, range, config)?;
    let mut message = format!("scored {} variants", scored.records().len());
    if scored.missing_confidence() > 0 {
        message.push_str(&format!(", {} with missing confidence", scored.missing_confidence()));
    }
    if scored.malformed() > 0 {
        message.push_str(&format!(", {} malformed rows dropped", scored.malformed()));
    }
    Ok(message)
}

/// Scores every table in `filtered/csv_files/` into `Confidence/{sample}_confidence.csv`.
/// Files are scored in parallel on the global rayon pool, and each one is its own unit; reports come back in file name order.
/// # Arguments
/// * `layout` - the dataset paths
/// * `range` - the inclusive position range to keep
/// * `config` - the scoring parameters
pub fn score_dataset(layout: &DatasetLayout, range: PositionRange, config: &ScoringConfig) -> Vec<UnitReport> {
    let csv_dir = layout.csv_dir();
    if !csv_dir.is_dir() {
        return vec![UnitReport::skipped(
            layout.name().to_string(), format!("CSV folder {csv_dir:?} does not exist")
        )];
    }

    let output_dir = layout.confidence_dir();
    let setup = std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Error while creating {output_dir:?}:"))
        .and_then(|()| find_matching_files(&csv_dir, "", ".csv"));
    let input_files = match setup {
        Ok(f) => f,
        Err(e) => return vec![UnitReport::from_result(layout.name().to_string(), Err(e))]
    };
    if input_files.is_empty() {
        return vec![UnitReport::skipped(
            layout.name().to_string(), format!("no CSV files found in {csv_dir:?}")
        )];
    }
    info!("Scoring {} files in {}...", input_files.len(), layout.name());

    input_files.par_iter()
        .map(|input_fn| {
            let stem = sample_stem(input_fn).unwrap_or_else(|| input_fn.display().to_string());
            let output_fn = confidence_path_for(&output_dir, &stem);
            debug!("Scoring {input_fn:?} -> {output_fn:?}");
            let result = score_unit(input_fn, &output_fn, range, config);
            UnitReport::from_result(unit_label(layout, &stem), result)
        })
        .progress_with_style(get_progress_style())
        .collect()
}
