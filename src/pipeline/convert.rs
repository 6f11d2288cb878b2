
use anyhow::Context;
use indicatif::ProgressIterator;
use log::info;

use crate::data_types::dataset::DatasetLayout;
use crate::data_types::outcome::UnitReport;
use crate::data_types::pipeline_error::PipelineError;
use crate::pipeline::unit_label;
use crate::util::file_discovery::unique_sample_stems;
use crate::util::progress_bar::get_progress_style;
use crate::vcf_converter::{convert_vcf_file, vcf_path_for};

/// Converts every sample VCF in `filtered/` into `filtered/csv_files/{sample}.csv`.
/// Samples are discovered from any ".gz" file in `filtered/`, and each one is its own unit.
/// # Arguments
/// * `layout` - the dataset paths
/// * `chrom` - the chromosome to keep
pub fn convert_dataset(layout: &DatasetLayout, chrom: &str) -> Vec<UnitReport> {
    let filtered_dir = layout.filtered_dir();
    let csv_dir = layout.csv_dir();

    let setup = std::fs::create_dir_all(&csv_dir)
        .with_context(|| format!("Error while creating {csv_dir:?}:"))
        .and_then(|()| unique_sample_stems(&filtered_dir, ".gz"));
    let stems = match setup {
        Ok(s) => s,
        Err(e) => return vec![UnitReport::from_result(layout.name().to_string(), Err(e))]
    };
    if stems.is_empty() {
        return vec![UnitReport::skipped(
            layout.name().to_string(), format!("no VCF files found in {filtered_dir:?}")
        )];
    }
    info!("Converting {} samples in {}...", stems.len(), layout.name());

    let mut reports = vec![];
    for stem in stems.iter().progress_with_style(get_progress_style()) {
        let unit = unit_label(layout, stem);
        let output_fn = csv_dir.join(format!("{stem}.csv"));
        let vcf_fn = vcf_path_for(&filtered_dir, stem);

        if output_fn.exists() {
            reports.push(UnitReport::from_result(unit, Err(PipelineError::OutputExists { path: output_fn }.into())));
            continue;
        }
        if !vcf_fn.exists() {
            reports.push(UnitReport::skipped(unit, format!("{vcf_fn:?} does not exist")));
            continue;
        }

        let result = convert_vcf_file(&vcf_fn, &output_fn, chrom)
            .map(|stats| format!(
                "kept {} rows ({} other chromosome, {} <NON_REF>, {} malformed)",
                stats.kept, stats.other_chrom, stats.non_ref, stats.malformed
            ));
        reports.push(UnitReport::from_result(unit, result));
    }
    reports
}
