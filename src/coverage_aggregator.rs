/*!
# Coverage Aggregator
Summarizes the per-base depth files of every sample in a dataset and merges the results into the dataset metadata table.
Each region (by default the primary UNC region and the secondary chr11 region) gets its own set of columns:
* primary: `Average_Depth_UNC, Coverage_>2, Coverage_>4, Coverage_>8, Coverage_>10`
* secondary: `Coverage_>2_chr11, Coverage_>4_chr11, Coverage_>8_chr11, Coverage_>10_chr11`

A table that already has the completion marker column, or every column of any one region, is left alone, so the stage can be re-run safely.
Rows with a blank `Run` never match depth files and keep empty coverage cells.
*/
use anyhow::Context;
use derive_builder::Builder;
use indexmap::IndexSet;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::data_types::coverage_summary::{CoverageStats, CoverageSummaryRow};
use crate::data_types::pipeline_error::PipelineError;
use crate::data_types::processing_status::{completed_marker_set, ProcessingStatus};
use crate::data_types::table::{CardinalityMismatch, Table};
use crate::parsing::depth_table::summarize_depth_file;
use crate::util::file_discovery::find_matching_files;
use crate::writers::delimiter_for;
use crate::writers::table_writer::write_table;

/// Mean depth column for the primary region, also the marker for a completed run
pub const AVERAGE_DEPTH_PRIMARY: &str = "Average_Depth_UNC";
/// Every threshold count column starts with this
pub const COVERAGE_COLUMN_PREFIX: &str = "Coverage_>";
/// The join key between metadata and coverage tables
pub const RUN_COLUMN: &str = "Run";
/// Depth cutoffs; a position counts if its depth is strictly greater
pub const DEFAULT_THRESHOLDS: [u64; 4] = [2, 4, 8, 10];
/// Shared middle part of every depth file name
const DEPTH_FILE_INFIX: &str = "_Aligned.sortedByCoord.out_";

/// A region with its own depth files and output columns
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CoverageRegion {
    /// Name used in logs and reports
    label: String,
    /// Tag in the depth file name; e.g. "UNC" in `{Run}_Aligned.sortedByCoord.out_UNC_coverage.txt`
    file_tag: String,
    /// Appended to each threshold column name; e.g. "_chr11"
    column_suffix: String,
    /// If set, the mean depth is reported in this column
    mean_column: Option<String>
}

impl CoverageRegion {
    /// Constructor
    pub fn new(label: &str, file_tag: &str, column_suffix: &str, mean_column: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            file_tag: file_tag.to_string(),
            column_suffix: column_suffix.to_string(),
            mean_column: mean_column.map(String::from)
        }
    }

    /// The UNC region, which also reports the mean depth
    pub fn primary() -> Self {
        Self::new("UNC", "UNC", "", Some(AVERAGE_DEPTH_PRIMARY))
    }

    /// The chr11 region, threshold counts only
    pub fn secondary() -> Self {
        Self::new("chr11", "chr11", "_chr11", None)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// End of the file name for this region's depth files
    pub fn file_suffix(&self) -> String {
        format!("{DEPTH_FILE_INFIX}{}_coverage.txt", self.file_tag)
    }

    /// Name of the count column for one threshold
    pub fn threshold_column(&self, threshold: u64) -> String {
        format!("{COVERAGE_COLUMN_PREFIX}{threshold}{}", self.column_suffix)
    }

    /// All output columns for this region in order, `Run` excluded
    pub fn columns(&self, thresholds: &[u64]) -> Vec<String> {
        self.mean_column.iter().cloned()
            .chain(thresholds.iter().map(|&t| self.threshold_column(t)))
            .collect()
    }

    /// Converts one summary into the cells for `columns(...)`
    fn row_cells(&self, summary: &CoverageSummaryRow) -> Vec<String> {
        let stats: &CoverageStats = &summary.stats;
        let mut cells = vec![summary.run.clone()];
        if self.mean_column.is_some() {
            cells.push(stats.mean_depth().map(format_mean).unwrap_or_default());
        }
        cells.extend(stats.threshold_counts().iter().map(|(_t, count)| count.to_string()));
        cells
    }
}

/// Means are written like the rest of the float columns, always with a decimal point
fn format_mean(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Thresholds and regions for the coverage stage
#[derive(Builder, Clone, Debug, PartialEq, Eq, Serialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct CoverageConfig {
    /// Depth cutoffs for the count columns
    #[builder(default = "DEFAULT_THRESHOLDS.to_vec()")]
    thresholds: Vec<u64>,
    /// Regions in merge order
    #[builder(default = "vec![CoverageRegion::primary(), CoverageRegion::secondary()]")]
    regions: Vec<CoverageRegion>,
    /// Column that only exists once the stage has completed
    #[builder(default = "AVERAGE_DEPTH_PRIMARY.to_string()")]
    completed_marker: String
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            regions: vec![CoverageRegion::primary(), CoverageRegion::secondary()],
            completed_marker: AVERAGE_DEPTH_PRIMARY.to_string()
        }
    }
}

impl CoverageConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(thresholds) = self.thresholds.as_ref() {
            if thresholds.is_empty() {
                return Err("at least one threshold is required".to_string());
            }
        }
        if let Some(regions) = self.regions.as_ref() {
            if regions.is_empty() {
                return Err("at least one region is required".to_string());
            }
        }
        Ok(())
    }
}

impl CoverageConfig {
    pub fn thresholds(&self) -> &[u64] {
        &self.thresholds
    }

    pub fn regions(&self) -> &[CoverageRegion] {
        &self.regions
    }

    pub fn completed_marker(&self) -> &str {
        &self.completed_marker
    }

    /// True for any column this stage writes
    pub fn is_coverage_column(&self, column: &str) -> bool {
        column.starts_with(COVERAGE_COLUMN_PREFIX) ||
            column == self.completed_marker ||
            self.regions.iter().any(|r| r.mean_column.as_deref() == Some(column))
    }

    /// Column sets that only a complete run writes: the marker column, and the full column set of each region.
    /// A table holding any one of these sets has been through this stage.
    pub fn marker_sets(&self) -> Vec<Vec<String>> {
        std::iter::once(vec![self.completed_marker.clone()])
            .chain(self.regions.iter().map(|r| r.columns(&self.thresholds)))
            .collect()
    }

    /// Infers whether a table has already been through this stage
    pub fn status_of<S: AsRef<str>>(&self, headers: &[S]) -> ProcessingStatus {
        ProcessingStatus::from_headers(headers, &self.marker_sets(), |c| self.is_coverage_column(c))
    }
}

/// What happened to one region during aggregation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegionReport {
    /// The region label
    pub label: String,
    /// Depth files read across all samples
    pub matched_files: usize,
    /// Samples that had no depth file for this region
    pub samples_without_files: Vec<String>,
    /// Set if joining this region changed the number of metadata rows
    pub cardinality_mismatch: Option<CardinalityMismatch>
}

impl RegionReport {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            matched_files: 0,
            samples_without_files: vec![],
            cardinality_mismatch: None
        }
    }

    /// Regions without any files are left out of the merge
    pub fn is_merged(&self) -> bool {
        self.matched_files > 0
    }
}

/// Result of a successful aggregation
#[derive(Clone, Debug, Serialize)]
pub struct CoverageReport {
    /// The metadata table that was updated
    pub metadata: PathBuf,
    /// Copy of the metadata table before the update
    pub backup: PathBuf,
    /// Status of the table before the update
    pub prior_status: ProcessingStatus,
    /// Old coverage columns that were removed before merging
    pub dropped_columns: Vec<String>,
    /// Number of metadata rows after the merge
    pub rows_written: usize,
    /// One entry per configured region
    pub regions: Vec<RegionReport>
}

/// Returns the backup location for a metadata table; e.g. `meta.csv` -> `meta.csv.bak`
pub fn backup_path(metadata_fn: &Path) -> PathBuf {
    let mut name = metadata_fn.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// Builds the table for one region, one row per matching depth file in sample order.
/// # Arguments
/// * `region` - the region to summarize
/// * `runs` - unique sample identifiers in metadata order
/// * `depth_dir` - folder with the depth files
/// * `thresholds` - depth cutoffs
/// # Errors
/// * if a depth file cannot be read or parsed
fn summarize_region(region: &CoverageRegion, runs: &IndexSet<String>, depth_dir: &Path, thresholds: &[u64]) -> anyhow::Result<(Table, RegionReport)> {
    let mut headers = vec![RUN_COLUMN.to_string()];
    headers.extend(region.columns(thresholds));
    let mut table = Table::new(headers);
    let mut report = RegionReport::new(region.label());

    let file_suffix = region.file_suffix();
    for run in runs.iter() {
        let depth_files = find_matching_files(depth_dir, run, &file_suffix)?;
        if depth_files.is_empty() {
            debug!("No {} coverage files found for sample {run}", region.label());
            report.samples_without_files.push(run.clone());
            continue;
        }

        for depth_fn in depth_files.iter() {
            debug!("Summarizing {depth_fn:?}...");
            let stats = summarize_depth_file(depth_fn, thresholds)?;
            let summary = CoverageSummaryRow { run: run.clone(), stats };
            table.push_row(region.row_cells(&summary))?;
            report.matched_files += 1;
        }
    }

    if !report.samples_without_files.is_empty() {
        warn!(
            "No {} coverage files found for {} / {} samples",
            region.label(), report.samples_without_files.len(), runs.len()
        );
    }
    Ok((table, report))
}

/// Computes coverage statistics for every sample in a metadata table and merges them into it.
/// The original table is copied to `{metadata}.bak` first, and the update replaces the file atomically.
/// # Arguments
/// * `metadata_fn` - the metadata table keyed by `Run`
/// * `depth_dir` - folder containing the per-base depth files
/// * `config` - thresholds and regions
/// # Errors
/// * `PipelineError::AlreadyProcessed` if the table already has the completion marker; nothing is written
/// * `PipelineError::NoCoverageFiles` if no region has any depth files; nothing is written
/// * if the metadata is missing or has no `Run` column
/// * if any depth file cannot be parsed, or the outputs cannot be written
pub fn aggregate_coverage(metadata_fn: &Path, depth_dir: &Path, config: &CoverageConfig) -> anyhow::Result<CoverageReport> {
    if !metadata_fn.exists() {
        return Err(PipelineError::MissingInput { label: "Metadata table".to_string(), path: metadata_fn.to_path_buf() }.into());
    }
    let metadata = Table::from_path(metadata_fn)?;

    let prior_status = config.status_of(metadata.headers());
    match prior_status {
        ProcessingStatus::Completed => {
            let marker_sets = config.marker_sets();
            let marker = completed_marker_set(metadata.headers(), &marker_sets)
                .map(|set| set.join(","))
                .unwrap_or_else(|| config.completed_marker().to_string());
            return Err(PipelineError::AlreadyProcessed {
                path: metadata_fn.to_path_buf(),
                marker
            }.into());
        },
        ProcessingStatus::CorruptPartial => {
            warn!("{metadata_fn:?} has partial coverage columns from a previous run, they will be replaced");
        },
        ProcessingStatus::NotStarted => {}
    };

    let run_values = metadata.column_values(RUN_COLUMN)
        .ok_or_else(|| PipelineError::MissingColumn { column: RUN_COLUMN.to_string(), path: metadata_fn.to_path_buf() })?;
    // blank identifiers never match depth files, a "" prefix would match all of them
    let num_blank = run_values.iter().filter(|r| r.trim().is_empty()).count();
    let (runs, blank_runs): (IndexSet<String>, IndexSet<String>) = run_values.into_iter()
        .map(String::from)
        .partition(|r| !r.trim().is_empty());
    if num_blank > 0 {
        warn!("{metadata_fn:?} has {num_blank} rows without a {RUN_COLUMN} value, they will not get coverage");
    }
    info!("Collecting coverage for {} samples from {depth_dir:?}...", runs.len());

    let mut region_results = vec![];
    for region in config.regions().iter() {
        let (table, mut report) = summarize_region(region, &runs, depth_dir, config.thresholds())
            .with_context(|| format!("Error while summarizing {} coverage:", region.label()))?;
        report.samples_without_files.extend(blank_runs.iter().cloned());
        if !report.is_merged() {
            warn!("No {} coverage files found for any samples, skipping {} coverage", region.label(), region.label());
        }
        region_results.push((table, report));
    }

    if region_results.iter().all(|(_t, r)| !r.is_merged()) {
        return Err(PipelineError::NoCoverageFiles { path: depth_dir.to_path_buf() }.into());
    }

    // keep the pre-merge table around before anything else changes
    let delimiter = delimiter_for(metadata_fn);
    let backup = backup_path(metadata_fn);
    if prior_status != ProcessingStatus::NotStarted && backup.exists() {
        // a rerun keeps the backup of the untouched table
        info!("Keeping existing backup {backup:?}");
    } else {
        write_table(&metadata, &backup, delimiter)
            .with_context(|| format!("Error while writing backup {backup:?}:"))?;
        info!("Backup created: {backup:?}");
    }

    let mut merged = metadata;
    let dropped_columns = merged.drop_columns(|c| config.is_coverage_column(c));
    if !dropped_columns.is_empty() {
        debug!("Dropped existing coverage columns: {dropped_columns:?}");
    }

    let mut regions = vec![];
    for (table, mut report) in region_results.into_iter() {
        if report.is_merged() {
            let rows_before = merged.len();
            merged = merged.left_join(&table, RUN_COLUMN)?;
            report.cardinality_mismatch = merged.check_cardinality(rows_before);
            if let Some(mismatch) = report.cardinality_mismatch {
                warn!(
                    "Merging {} coverage resulted in {} rows, but expected {} rows",
                    report.label, mismatch.observed, mismatch.expected
                );
            }
        }
        regions.push(report);
    }

    write_table(&merged, metadata_fn, delimiter)
        .with_context(|| format!("Error while writing {metadata_fn:?}:"))?;

    Ok(CoverageReport {
        metadata: metadata_fn.to_path_buf(),
        backup,
        prior_status,
        dropped_columns,
        rows_written: merged.len(),
        regions
    })
}
