
use clap::Args;
use log::info;
use serde::Serialize;

use crate::cli::core::{check_dataset_settings, DatasetSettings, AFTER_HELP, FULL_VERSION};
use crate::data_types::position_range::PositionRange;

/// Only the first dataset is counted by default
const COUNT_DEFAULT_DATASETS: [&str; 1] = ["source_dir"];

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct CountSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    varsift_version: String,

    #[clap(flatten)]
    pub datasets: DatasetSettings,

    /// First position of the UNC region (inclusive)
    #[clap(long = "unc-min")]
    #[clap(value_name = "POS")]
    #[clap(help_heading = Some("Count parameters"))]
    #[clap(default_value = "67991100")]
    pub unc_min: u64,

    /// Last position of the UNC region (inclusive)
    #[clap(long = "unc-max")]
    #[clap(value_name = "POS")]
    #[clap(help_heading = Some("Count parameters"))]
    #[clap(default_value = "68005150")]
    pub unc_max: u64,
}

impl CountSettings {
    /// The UNC region from the settings; only valid after `check_count_settings(...)`
    pub fn unc_range(&self) -> anyhow::Result<PositionRange> {
        PositionRange::new(self.unc_min, self.unc_max)
    }
}

pub fn check_count_settings(mut settings: CountSettings) -> anyhow::Result<CountSettings> {
    // hard code the version in
    settings.varsift_version = FULL_VERSION.clone();
    info!("varsift version: {:?}", &settings.varsift_version);
    info!("Sub-command: count");

    check_dataset_settings(&mut settings.datasets, &COUNT_DEFAULT_DATASETS)?;

    info!("Count parameters:");
    let unc_range = settings.unc_range()?;
    info!("\tUNC region: {unc_range}");

    Ok(settings)
}
