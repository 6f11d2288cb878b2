/*!
# Mutation Counter
Counts the converted variants of each sample in a dataset, both overall (`chr11_mut`) and within the UNC region (`unc_mut`).
The counts are then joined with the SRA run table on `Run`, which produces the metadata table used by the coverage stage.
*/
use anyhow::Context;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::data_types::pipeline_error::PipelineError;
use crate::data_types::position_range::PositionRange;
use crate::data_types::table::{CardinalityMismatch, Table};
use crate::data_types::variant_record::COLUMN_POS;
use crate::util::file_discovery::unique_sample_stems;
use crate::writers::delimiter_for;
use crate::writers::table_writer::write_table;

/// Start of the UNC region, inclusive
pub const DEFAULT_UNC_MIN: u64 = 67991100;
/// End of the UNC region, inclusive
pub const DEFAULT_UNC_MAX: u64 = 68005150;
/// Columns of the count table, in order
pub const MUTATION_COUNT_COLUMNS: [&str; 3] = ["Run", "unc_mut", "chr11_mut"];

/// Variant counts for one sample
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationCount {
    /// Sample identifier, taken from the file stem
    pub run: String,
    /// Variants inside the UNC region
    pub unc_mut: u64,
    /// All variants in the converted table
    pub chr11_mut: u64
}

impl MutationCount {
    /// Cells in `MUTATION_COUNT_COLUMNS` order
    fn to_row(&self) -> Vec<String> {
        vec![self.run.clone(), self.unc_mut.to_string(), self.chr11_mut.to_string()]
    }
}

/// Counts the rows of one converted table
/// # Arguments
/// * `csv_fn` - the converted table, must have a POS column
/// * `run` - the sample identifier
/// * `unc_range` - the inclusive UNC region
/// # Errors
/// * if the file cannot be read, has no POS column, or has a POS that is not an integer
pub fn count_mutations(csv_fn: &Path, run: &str, unc_range: PositionRange) -> anyhow::Result<MutationCount> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(csv_fn))
        .from_path(csv_fn)
        .with_context(|| format!("Error while opening {csv_fn:?}:"))?;
    let pos_index = csv_reader.headers()
        .with_context(|| format!("Error while reading header from {csv_fn:?}:"))?
        .iter()
        .position(|h| h == COLUMN_POS)
        .ok_or_else(|| PipelineError::MissingColumn { column: COLUMN_POS.to_string(), path: csv_fn.to_path_buf() })?;

    let mut count = MutationCount { run: run.to_string(), unc_mut: 0, chr11_mut: 0 };
    for (i, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("Error while reading row {} of {csv_fn:?}:", i + 1))?;
        let raw_pos = record.get(pos_index).unwrap_or_default();
        let position: u64 = raw_pos.trim().parse()
            .with_context(|| format!("Error while parsing POS {raw_pos:?} in row {} of {csv_fn:?}:", i + 1))?;
        count.chr11_mut += 1;
        if unc_range.contains(position) {
            count.unc_mut += 1;
        }
    }
    Ok(count)
}

/// Result of a successful dataset count
#[derive(Clone, Debug, Serialize)]
pub struct CountReport {
    /// The metadata table that was written
    pub output: PathBuf,
    /// Samples that made it into the table
    pub samples_counted: usize,
    /// Samples that were excluded because their table could not be counted
    pub failed_samples: Vec<String>,
    /// Set if the SRA join changed the number of rows
    pub cardinality_mismatch: Option<CardinalityMismatch>
}

/// Counts every sample in a CSV folder, joins with the SRA run table, and writes the result.
/// # Arguments
/// * `csv_dir` - folder with one `{sample}.csv` per sample
/// * `sra_fn` - the SRA run table, keyed by `Run`
/// * `output_fn` - the metadata table to create
/// * `unc_range` - the inclusive UNC region
/// # Errors
/// * `PipelineError::OutputExists` if the output is already there; nothing is written
/// * `PipelineError::MissingInput` if the CSV folder or SRA table are missing
/// * `PipelineError::NoSamples` if no sample could be counted
/// * if the SRA table cannot be loaded or joined, or the output cannot be written
pub fn count_dataset(csv_dir: &Path, sra_fn: &Path, output_fn: &Path, unc_range: PositionRange) -> anyhow::Result<CountReport> {
    if !csv_dir.is_dir() {
        return Err(PipelineError::MissingInput { label: "CSV folder".to_string(), path: csv_dir.to_path_buf() }.into());
    }
    if output_fn.exists() {
        return Err(PipelineError::OutputExists { path: output_fn.to_path_buf() }.into());
    }
    if !sra_fn.exists() {
        return Err(PipelineError::MissingInput { label: "SRA run table".to_string(), path: sra_fn.to_path_buf() }.into());
    }

    let stems = unique_sample_stems(csv_dir, ".csv")?;
    info!("Found {} unique samples in {csv_dir:?}", stems.len());

    let mut counts = Table::new(MUTATION_COUNT_COLUMNS.iter().map(|c| c.to_string()).collect());
    let mut failed_samples = vec![];
    for stem in stems.iter() {
        let sample_fn = csv_dir.join(format!("{stem}.csv"));
        if !sample_fn.exists() {
            warn!("File not found for sample {stem}, skipping");
            continue;
        }

        match count_mutations(&sample_fn, stem, unc_range) {
            Ok(count) => {
                debug!("{stem}: unc_mut={}, chr11_mut={}", count.unc_mut, count.chr11_mut);
                counts.push_row(count.to_row())?;
            },
            Err(e) => {
                warn!("Error while counting sample {stem}: {e:#}");
                failed_samples.push(stem.clone());
            }
        };
    }

    if counts.is_empty() {
        return Err(PipelineError::NoSamples { path: csv_dir.to_path_buf() }.into());
    }
    info!("Processed {} samples with mutation counts", counts.len());

    let sra_table = Table::from_path(sra_fn)?;
    let merged = counts.left_join(&sra_table, MUTATION_COUNT_COLUMNS[0])
        .with_context(|| format!("Error while merging with {sra_fn:?}:"))?;
    let cardinality_mismatch = merged.check_cardinality(counts.len());
    if let Some(mismatch) = cardinality_mismatch {
        warn!("Merge resulted in {} rows, but expected {} rows", mismatch.observed, mismatch.expected);
    }

    write_table(&merged, output_fn, delimiter_for(output_fn))
        .with_context(|| format!("Error while writing {output_fn:?}:"))?;

    Ok(CountReport {
        output: output_fn.to_path_buf(),
        samples_counted: counts.len(),
        failed_samples,
        cardinality_mismatch
    })
}
