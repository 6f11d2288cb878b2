
use anyhow::ensure;
use clap::Args;
use log::info;
use serde::Serialize;

use crate::cli::core::{check_dataset_settings, DatasetSettings, AFTER_HELP, FULL_VERSION};
use crate::confidence_scorer::{ScoringConfig, ScoringConfigBuilder};
use crate::data_types::position_range::PositionRange;
use crate::pipeline::DEFAULT_DATASETS;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct ConfidenceSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    varsift_version: String,

    #[clap(flatten)]
    pub datasets: DatasetSettings,

    /// First position to score (inclusive)
    #[clap(long = "pos-min")]
    #[clap(value_name = "POS")]
    #[clap(help_heading = Some("Region"))]
    #[clap(default_value = "67990100")]
    pub pos_min: u64,

    /// Last position to score (inclusive)
    #[clap(long = "pos-max")]
    #[clap(value_name = "POS")]
    #[clap(help_heading = Some("Region"))]
    #[clap(default_value = "68005097")]
    pub pos_max: u64,

    /// Weight of the genotype quality component
    #[clap(long = "gq-weight")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Scoring parameters"))]
    #[clap(default_value = "0.4")]
    pub gq_weight: f64,

    /// Weight of the call quality component
    #[clap(long = "qual-weight")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Scoring parameters"))]
    #[clap(default_value = "0.4")]
    pub qual_weight: f64,

    /// Weight of the read depth component
    #[clap(long = "dp-weight")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Scoring parameters"))]
    #[clap(default_value = "0.2")]
    pub dp_weight: f64,

    /// QUAL values above this are capped before scoring
    #[clap(long = "qual-cap")]
    #[clap(value_name = "FLOAT")]
    #[clap(help_heading = Some("Scoring parameters"))]
    #[clap(default_value = "50")]
    pub qual_cap: f64,

    /// Number of threads to use for scoring files
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,
}

impl ConfidenceSettings {
    /// The scoring range from the settings
    pub fn position_range(&self) -> anyhow::Result<PositionRange> {
        PositionRange::new(self.pos_min, self.pos_max)
    }

    /// Builds the scoring config from the settings
    /// # Errors
    /// * if the weights are negative or do not sum to 1.0
    pub fn scoring_config(&self) -> anyhow::Result<ScoringConfig> {
        let config = ScoringConfigBuilder::default()
            .gq_weight(self.gq_weight)
            .qual_weight(self.qual_weight)
            .dp_weight(self.dp_weight)
            .qual_cap(self.qual_cap)
            .build()?;
        Ok(config)
    }
}

pub fn check_confidence_settings(mut settings: ConfidenceSettings) -> anyhow::Result<ConfidenceSettings> {
    // hard code the version in
    settings.varsift_version = FULL_VERSION.clone();
    info!("varsift version: {:?}", &settings.varsift_version);
    info!("Sub-command: confidence");

    check_dataset_settings(&mut settings.datasets, &DEFAULT_DATASETS)?;

    info!("Scoring parameters:");
    let range = settings.position_range()?;
    info!("\tPosition range: {range}");
    ensure!(settings.qual_cap > 0.0, "--qual-cap must be >0");
    let config = settings.scoring_config()?;
    info!("\tWeights (GQ, QUAL, DP): ({}, {}, {})", config.gq_weight(), config.qual_weight(), config.dp_weight());
    info!("\tQUAL cap: {}", config.qual_cap());

    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Processing threads: {}", settings.threads);

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_config() {
        let mut settings = ConfidenceSettings {
            gq_weight: 0.4,
            qual_weight: 0.4,
            dp_weight: 0.2,
            qual_cap: 50.0,
            ..Default::default()
        };
        assert_eq!(settings.scoring_config().unwrap(), ScoringConfig::default());

        settings.dp_weight = 0.5;
        assert!(settings.scoring_config().is_err());
    }
}
