/*!
# Pipeline module
Drivers for each stage. A driver walks the requested dataset directories, runs its stage on each one, and turns every unit of work into a `UnitReport`.
A failing unit never stops its siblings; the caller gets a `RunSummary` with everything that happened.
*/
/// Scores every converted table in a dataset
pub mod confidence;
/// Converts every sample VCF in a dataset
pub mod convert;
/// Builds the mutation count metadata table for a dataset
pub mod count;
/// Merges coverage statistics into a dataset's metadata table
pub mod coverage;

use log::info;
use std::path::Path;

use crate::data_types::dataset::DatasetLayout;
use crate::data_types::outcome::{RunSummary, UnitReport};

/// Dataset directories processed when none are given
pub const DEFAULT_DATASETS: [&str; 3] = ["source_dir", "source_dir_4", "source_dir_6"];

/// Runs one stage over each dataset directory, in order.
/// Directories that do not exist are skipped; names that do not follow the dataset convention fail.
/// # Arguments
/// * `stage` - the stage name for the summary
/// * `base_path` - the folder containing the dataset directories
/// * `dataset_names` - directory names relative to `base_path`
/// * `process_fn` - runs the stage on one dataset and returns one report per unit
pub fn process_datasets<F>(stage: &str, base_path: &Path, dataset_names: &[String], mut process_fn: F) -> RunSummary
where
    F: FnMut(&DatasetLayout) -> Vec<UnitReport>
{
    let mut summary = RunSummary::new(stage);
    for name in dataset_names.iter() {
        let dataset_dir = base_path.join(name);
        if !dataset_dir.is_dir() {
            summary.add_report(UnitReport::skipped(
                name.clone(), format!("directory {dataset_dir:?} does not exist")
            ));
            continue;
        }

        let layout = match DatasetLayout::new(base_path, name) {
            Ok(l) => l,
            Err(e) => {
                summary.add_report(UnitReport::from_result(name.clone(), Err(e.into())));
                continue;
            }
        };

        info!("Processing {name}...");
        summary.extend(process_fn(&layout));
    }
    summary.log_summary();
    summary
}

/// Label for a unit inside a dataset; e.g. "source_dir/SRR001"
pub fn unit_label(layout: &DatasetLayout, unit: &str) -> String {
    format!("{}/{unit}", layout.name())
}
