
use anyhow::ensure;
use clap::Args;
use log::info;
use serde::Serialize;

use crate::cli::core::{check_dataset_settings, DatasetSettings, AFTER_HELP, FULL_VERSION};
use crate::coverage_aggregator::{CoverageConfig, CoverageConfigBuilder};
use crate::pipeline::DEFAULT_DATASETS;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct CoverageSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    varsift_version: String,

    #[clap(flatten)]
    pub datasets: DatasetSettings,

    /// Depth thresholds; a position is counted if its depth is strictly greater
    #[clap(long = "thresholds")]
    #[clap(value_name = "DEPTH")]
    #[clap(value_delimiter = ',')]
    #[clap(help_heading = Some("Coverage parameters"))]
    #[clap(default_value = "2,4,8,10")]
    pub thresholds: Vec<u64>,
}

impl CoverageSettings {
    /// Builds the coverage config from the settings
    pub fn coverage_config(&self) -> anyhow::Result<CoverageConfig> {
        let config = CoverageConfigBuilder::default()
            .thresholds(self.thresholds.clone())
            .build()?;
        Ok(config)
    }
}

pub fn check_coverage_settings(mut settings: CoverageSettings) -> anyhow::Result<CoverageSettings> {
    // hard code the version in
    settings.varsift_version = FULL_VERSION.clone();
    info!("varsift version: {:?}", &settings.varsift_version);
    info!("Sub-command: coverage");

    check_dataset_settings(&mut settings.datasets, &DEFAULT_DATASETS)?;

    info!("Coverage parameters:");
    ensure!(!settings.thresholds.is_empty(), "--thresholds requires at least one value");
    let mut sorted = settings.thresholds.clone();
    sorted.sort_unstable();
    sorted.dedup();
    ensure!(sorted.len() == settings.thresholds.len(), "--thresholds must not contain duplicates");
    info!("\tThresholds: {:?}", settings.thresholds);

    Ok(settings)
}
