
use anyhow::{bail, ensure};
use clap::{Args, Parser, Subcommand};
use chrono::Datelike;
use lazy_static::lazy_static;
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::confidence::ConfidenceSettings;
use crate::cli::convert::ConvertSettings;
use crate::cli::count::CountSettings;
use crate::cli::coverage::CoverageSettings;

lazy_static! {
    /// Stores the full version string we plan to use, which is generated in build.rs
    /// # Examples
    /// * `0.3.1-6bb9635-dirty` - while on a dirty branch
    /// * `0.3.1-6bb9635` - with a fresh commit
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));

    /// Shared after help string containing the legalese.
    pub static ref AFTER_HELP: String = format!("Copyright (C) 2024-{}     varsift contributors
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year());
}

#[derive(Parser)]
#[clap(author,
    version = &**FULL_VERSION,
    about,
    after_help = &**AFTER_HELP)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

/// varsift, batch post-processing for RNA-Seq variant calls.
/// Select a subcommand to see more usage information:
#[derive(Subcommand)]
pub enum Commands {
    /// Converts per-sample VCF files into filtered CSV tables
    Convert(Box<ConvertSettings>),
    /// Counts variants per sample and joins them with the SRA run table
    ///
    /// A dataset whose metadata table already exists is reported as skipped, not as a success.
    /// The exit code is non-zero when no dataset succeeded, so rerunning count over datasets that were all counted before exits with an error.
    Count(Box<CountSettings>),
    /// Scores every variant with a combined GQ/QUAL/DP confidence
    Confidence(Box<ConfidenceSettings>),
    /// Merges per-sample coverage statistics into the metadata tables
    Coverage(Box<CoverageSettings>)
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Options shared by every subcommand
#[derive(Args, Clone, Default, Serialize)]
pub struct DatasetSettings {
    /// Base folder containing the dataset directories
    #[clap(required = true)]
    #[clap(short = 'b')]
    #[clap(long = "base-path")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub base_path: PathBuf,

    /// Dataset directories to process, relative to the base path [default: subcommand specific]
    #[clap(short = 'd')]
    #[clap(long = "dirs")]
    #[clap(value_name = "NAME")]
    #[clap(num_args = 1..)]
    #[clap(help_heading = Some("Input/Output"))]
    pub dirs: Vec<String>,

    /// Optional output JSON with the outcome of every processed unit
    #[clap(long = "summary-json")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub summary_json: Option<PathBuf>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

/// Checks the shared dataset options, filling in the default directories if none were given
/// # Arguments
/// * `settings` - the parsed options
/// * `default_dirs` - directories to use when `--dirs` is empty
pub fn check_dataset_settings(settings: &mut DatasetSettings, default_dirs: &[&str]) -> anyhow::Result<()> {
    info!("Inputs:");
    check_required_filename(&settings.base_path, "Base path")?;
    ensure!(settings.base_path.is_dir(), "Base path is not a directory: {:?}", settings.base_path);
    info!("\tBase path: {:?}", &settings.base_path);

    if settings.dirs.is_empty() {
        settings.dirs = default_dirs.iter().map(|d| d.to_string()).collect();
    }
    ensure!(!settings.dirs.is_empty(), "--dirs requires at least one directory");
    info!("\tDataset directories: {:?}", &settings.dirs);

    info!("Outputs:");
    if let Some(summary_fn) = settings.summary_json.as_deref() {
        info!("\tSummary JSON: {summary_fn:?}");
    } else {
        info!("\tSummary JSON: None");
    }
    Ok(())
}

/// Checks if a file exists and will otherwise exit
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
pub fn check_required_filename(filename: &Path, label: &str) -> anyhow::Result<()> {
    if !filename.exists() {
        bail!("{} does not exist: \"{}\"", label, filename.display());
    }

    // file exists
    Ok(())
}
