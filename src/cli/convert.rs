
use anyhow::ensure;
use clap::Args;
use log::info;
use serde::Serialize;

use crate::cli::core::{check_dataset_settings, DatasetSettings, AFTER_HELP, FULL_VERSION};
use crate::pipeline::DEFAULT_DATASETS;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct ConvertSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    varsift_version: String,

    #[clap(flatten)]
    pub datasets: DatasetSettings,

    /// Chromosome to keep in the converted tables
    #[clap(long = "chrom")]
    #[clap(value_name = "CHROM")]
    #[clap(help_heading = Some("Conversion parameters"))]
    #[clap(default_value = "chr11")]
    pub chrom: String,
}

pub fn check_convert_settings(mut settings: ConvertSettings) -> anyhow::Result<ConvertSettings> {
    // hard code the version in
    settings.varsift_version = FULL_VERSION.clone();
    info!("varsift version: {:?}", &settings.varsift_version);
    info!("Sub-command: convert");

    check_dataset_settings(&mut settings.datasets, &DEFAULT_DATASETS)?;

    info!("Conversion parameters:");
    ensure!(!settings.chrom.is_empty(), "--chrom must not be empty");
    info!("\tChromosome: {}", settings.chrom);

    Ok(settings)
}
