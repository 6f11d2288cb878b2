
use log::{LevelFilter, error, info};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use varsift::cli::confidence::{ConfidenceSettings, check_confidence_settings};
use varsift::cli::convert::{ConvertSettings, check_convert_settings};
use varsift::cli::core::{Commands, get_cli};
use varsift::cli::count::{CountSettings, check_count_settings};
use varsift::cli::coverage::{CoverageSettings, check_coverage_settings};
use varsift::data_types::outcome::RunSummary;
use varsift::pipeline::confidence::score_dataset;
use varsift::pipeline::convert::convert_dataset;
use varsift::pipeline::count::count_dataset_mutations;
use varsift::pipeline::coverage::aggregate_dataset_coverage;
use varsift::pipeline::process_datasets;
use varsift::util::json_io::save_json;

/// Everything we write to the optional summary JSON
#[derive(Serialize)]
struct RunRecord<'a, S: Serialize> {
    settings: &'a S,
    summary: &'a RunSummary,
    elapsed_seconds: f64
}

/// Sets up logging before we check the other settings
fn init_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

/// Saves the optional summary JSON and converts the summary into the process exit code
fn finish_run<S: Serialize>(settings: &S, summary: &RunSummary, summary_json: Option<&Path>, start_time: Instant) -> exitcode::ExitCode {
    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    if let Some(summary_fn) = summary_json {
        info!("Saving run summary to {summary_fn:?}...");
        let record = RunRecord { settings, summary, elapsed_seconds };
        if let Err(e) = save_json(&record, summary_fn) {
            error!("Error while saving run summary: {e:#}");
            return exitcode::IOERR;
        }
    }
    info!("Stage {} completed in {elapsed_seconds} seconds.", summary.stage());
    summary.exit_code()
}

fn run_convert(settings: ConvertSettings) -> exitcode::ExitCode {
    // start the timer
    let start_time = Instant::now();
    init_logging(settings.datasets.verbosity);

    let settings = match check_convert_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            return exitcode::CONFIG;
        }
    };

    let summary = process_datasets(
        "convert", &settings.datasets.base_path, &settings.datasets.dirs,
        |layout| convert_dataset(layout, &settings.chrom)
    );
    finish_run(&settings, &summary, settings.datasets.summary_json.as_deref(), start_time)
}

fn run_count(settings: CountSettings) -> exitcode::ExitCode {
    let start_time = Instant::now();
    init_logging(settings.datasets.verbosity);

    let settings = match check_count_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            return exitcode::CONFIG;
        }
    };
    let unc_range = match settings.unc_range() {
        Ok(r) => r,
        Err(e) => {
            error!("Error while building UNC region: {e:#}");
            return exitcode::CONFIG;
        }
    };

    let summary = process_datasets(
        "count", &settings.datasets.base_path, &settings.datasets.dirs,
        |layout| count_dataset_mutations(layout, unc_range)
    );
    finish_run(&settings, &summary, settings.datasets.summary_json.as_deref(), start_time)
}

fn run_confidence(settings: ConfidenceSettings) -> exitcode::ExitCode {
    let start_time = Instant::now();
    init_logging(settings.datasets.verbosity);

    let settings = match check_confidence_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            return exitcode::CONFIG;
        }
    };

    // set up the number of threads for rayon
    match rayon::ThreadPoolBuilder::new().num_threads(settings.threads).build_global() {
        Ok(()) => {},
        Err(e) => {
            error!("Error while building thread pool: {e}");
            return exitcode::OSERR;
        }
    };

    let (range, scoring_config) = match settings.position_range().and_then(|r| Ok((r, settings.scoring_config()?))) {
        Ok(rc) => rc,
        Err(e) => {
            error!("Error while building scoring config: {e:#}");
            return exitcode::CONFIG;
        }
    };

    let summary = process_datasets(
        "confidence", &settings.datasets.base_path, &settings.datasets.dirs,
        |layout| score_dataset(layout, range, &scoring_config)
    );
    finish_run(&settings, &summary, settings.datasets.summary_json.as_deref(), start_time)
}

fn run_coverage(settings: CoverageSettings) -> exitcode::ExitCode {
    let start_time = Instant::now();
    init_logging(settings.datasets.verbosity);

    let settings = match check_coverage_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            return exitcode::CONFIG;
        }
    };
    let coverage_config = match settings.coverage_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Error while building coverage config: {e:#}");
            return exitcode::CONFIG;
        }
    };

    let summary = process_datasets(
        "coverage", &settings.datasets.base_path, &settings.datasets.dirs,
        |layout| aggregate_dataset_coverage(layout, &coverage_config)
    );
    finish_run(&settings, &summary, settings.datasets.summary_json.as_deref(), start_time)
}

fn main() {
    let cli = get_cli();
    let exit_code = match cli.command {
        Commands::Convert(settings) => run_convert(*settings),
        Commands::Count(settings) => run_count(*settings),
        Commands::Confidence(settings) => run_confidence(*settings),
        Commands::Coverage(settings) => run_coverage(*settings)
    };

    if exit_code == exitcode::OK {
        info!("Process finished successfully.");
    } else {
        error!("Process finished with errors.");
    }
    std::process::exit(exit_code);
}
