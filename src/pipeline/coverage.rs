
use itertools::Itertools;

use crate::coverage_aggregator::{aggregate_coverage, CoverageConfig};
use crate::data_types::dataset::DatasetLayout;
use crate::data_types::outcome::UnitReport;

/// Merges coverage statistics into the dataset metadata table; the whole dataset is one unit.
/// # Arguments
/// * `layout` - the dataset paths
/// * `config` - thresholds and regions
pub fn aggregate_dataset_coverage(layout: &DatasetLayout, config: &CoverageConfig) -> Vec<UnitReport> {
    let result = aggregate_coverage(&layout.metadata_table(), &layout.depth_dir(), config)
        .map(|report| {
            let regions = report.regions.iter()
                .map(|r| format!("{}: {} files", r.label, r.matched_files))
                .join(", ");
            format!("merged coverage into {:?} ({regions}), backup at {:?}", report.metadata, report.backup)
        });
    vec![UnitReport::from_result(layout.name().to_string(), result)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::outcome::UnitOutcome;

    #[test]
    fn test_aggregate_dataset_coverage() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DatasetLayout::new(dir.path(), "source_dir_4").unwrap();
        let config = CoverageConfig::default();

        // no metadata yet
        let reports = aggregate_dataset_coverage(&layout, &config);
        assert!(matches!(reports[0].outcome, UnitOutcome::Failed(_)));

        std::fs::create_dir_all(layout.filtered_dir()).unwrap();
        std::fs::write(layout.metadata_table(), "Run,unc_mut\nSRR100,1\n").unwrap();
        std::fs::create_dir_all(layout.depth_dir()).unwrap();
        std::fs::copy(
            "test_data/depth/SRR100_Aligned.sortedByCoord.out_UNC_coverage.txt",
            layout.depth_dir().join("SRR100_Aligned.sortedByCoord.out_UNC_coverage.txt")
        ).unwrap();

        let reports = aggregate_dataset_coverage(&layout, &config);
        assert!(reports[0].outcome.is_success());
        assert!(reports[0].outcome.message().contains("UNC: 1 files"));

        // second pass is a skip
        let reports = aggregate_dataset_coverage(&layout, &config);
        assert!(matches!(reports[0].outcome, UnitOutcome::Skipped(_)));
    }
}
