
use crate::data_types::dataset::DatasetLayout;
use crate::data_types::outcome::UnitReport;
use crate::data_types::position_range::PositionRange;
use crate::mutation_counter::count_dataset;

/// Builds `filtered/mutation_counts_metadata_{suffix}.csv` for one dataset; the whole dataset is one unit.
/// # Arguments
/// * `layout` - the dataset paths
/// * `unc_range` - the inclusive UNC region
pub fn count_dataset_mutations(layout: &DatasetLayout, unc_range: PositionRange) -> Vec<UnitReport> {
    let result = count_dataset(&layout.csv_dir(), &layout.sra_table(), &layout.metadata_table(), unc_range)
        .map(|report| {
            let mut message = format!("counted {} samples into {:?}", report.samples_counted, report.output);
            if !report.failed_samples.is_empty() {
                message.push_str(&format!(", {} samples excluded: {:?}", report.failed_samples.len(), report.failed_samples));
            }
            if let Some(mismatch) = report.cardinality_mismatch {
                message.push_str(&format!(", join produced {} rows from {}", mismatch.observed, mismatch.expected));
            }
            message
        });
    vec![UnitReport::from_result(layout.name().to_string(), result)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::outcome::UnitOutcome;
    use crate::mutation_counter::{DEFAULT_UNC_MAX, DEFAULT_UNC_MIN};

    #[test]
    fn test_count_dataset_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DatasetLayout::new(dir.path(), "source_dir").unwrap();
        std::fs::create_dir_all(layout.csv_dir()).unwrap();
        std::fs::copy("test_data/variants/SRR200.csv", layout.csv_dir().join("SRR200.csv")).unwrap();
        let unc_range = PositionRange::new(DEFAULT_UNC_MIN, DEFAULT_UNC_MAX).unwrap();

        // no SRA table yet
        let reports = count_dataset_mutations(&layout, unc_range);
        assert!(matches!(reports[0].outcome, UnitOutcome::Failed(_)));

        std::fs::create_dir_all(layout.sra_table().parent().unwrap()).unwrap();
        std::fs::write(layout.sra_table(), "Run,Tissue\nSRR200,liver\n").unwrap();
        let reports = count_dataset_mutations(&layout, unc_range);
        assert!(reports[0].outcome.is_success());
        let content = std::fs::read_to_string(layout.metadata_table()).unwrap();
        assert_eq!(content, "Run,unc_mut,chr11_mut,Tissue\nSRR200,3,4,liver\n");

        let reports = count_dataset_mutations(&layout, unc_range);
        assert!(matches!(reports[0].outcome, UnitOutcome::Skipped(_)));
    }
}
