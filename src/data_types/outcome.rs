
use log::{error, info, warn};
use serde::Serialize;

use crate::data_types::pipeline_error::PipelineError;

/// The result of processing one unit of work (a file, a sample, or a dataset)
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "message", rename_all = "snake_case")]
pub enum UnitOutcome {
    /// The unit was processed and its outputs written
    Success(String),
    /// Nothing needed doing; e.g., the output already exists
    Skipped(String),
    /// The unit could not be processed; siblings are unaffected
    Failed(String)
}

impl UnitOutcome {
    /// Classifies an error into a skip or a failure.
    /// Any `PipelineError` in the chain that is a skip makes this a skip.
    pub fn from_error(error: &anyhow::Error) -> Self {
        let is_skip = error.chain()
            .filter_map(|e| e.downcast_ref::<PipelineError>())
            .any(|e| e.is_skip());
        if is_skip {
            UnitOutcome::Skipped(format!("{error:#}"))
        } else {
            UnitOutcome::Failed(format!("{error:#}"))
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UnitOutcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            UnitOutcome::Success(m) |
            UnitOutcome::Skipped(m) |
            UnitOutcome::Failed(m) => m
        }
    }
}

/// A labeled outcome, one per unit
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    /// Label for the unit, usually "dataset" or "dataset/sample"
    pub unit: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: UnitOutcome
}

impl UnitReport {
    /// Constructor
    pub fn new(unit: String, outcome: UnitOutcome) -> Self {
        Self { unit, outcome }
    }

    /// Builds a report from a unit result, logging it along the way
    /// # Arguments
    /// * `unit` - the unit label
    /// * `result` - the result of processing, where Ok holds the success message
    pub fn from_result(unit: String, result: anyhow::Result<String>) -> Self {
        let outcome = match result {
            Ok(message) => UnitOutcome::Success(message),
            Err(e) => UnitOutcome::from_error(&e)
        };
        match &outcome {
            UnitOutcome::Success(m) => info!("{unit}: {m}"),
            UnitOutcome::Skipped(m) => warn!("{unit}: skipped, {m}"),
            UnitOutcome::Failed(m) => error!("{unit}: {m}")
        };
        Self::new(unit, outcome)
    }

    /// Builds a skip for a unit that had nothing to process, logging it along the way
    pub fn skipped(unit: String, reason: String) -> Self {
        warn!("{unit}: skipped, {reason}");
        Self::new(unit, UnitOutcome::Skipped(reason))
    }
}

/// Aggregated counts for a full run of one stage
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunSummary {
    /// The stage that was run
    stage: String,
    /// Number of units that succeeded
    succeeded: u64,
    /// Number of units that were skipped
    skipped: u64,
    /// Number of units that failed
    failed: u64,
    /// Every unit in processing order
    units: Vec<UnitReport>
}

impl RunSummary {
    /// Creates an empty summary for a stage
    pub fn new(stage: &str) -> Self {
        Self {
            stage: stage.to_string(),
            ..Default::default()
        }
    }

    /// Adds a unit report to the tallies
    pub fn add_report(&mut self, report: UnitReport) {
        match report.outcome {
            UnitOutcome::Success(_) => self.succeeded += 1,
            UnitOutcome::Skipped(_) => self.skipped += 1,
            UnitOutcome::Failed(_) => self.failed += 1
        };
        self.units.push(report);
    }

    // getters
    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn units(&self) -> &[UnitReport] {
        &self.units
    }

    /// The run is only a failure if nothing succeeded
    pub fn exit_code(&self) -> exitcode::ExitCode {
        if self.succeeded > 0 {
            exitcode::OK
        } else {
            exitcode::DATAERR
        }
    }

    /// Dumps the tallies to the logger
    pub fn log_summary(&self) {
        info!("Summary for {}:", self.stage);
        info!("\tSucceeded: {}", self.succeeded);
        info!("\tSkipped: {}", self.skipped);
        info!("\tFailed: {}", self.failed);
        if self.succeeded == 0 {
            error!("No units were successfully processed");
        }
    }
}

impl Extend<UnitReport> for RunSummary {
    fn extend<T: IntoIterator<Item = UnitReport>>(&mut self, iter: T) {
        for report in iter {
            self.add_report(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_from_error() {
        let skip: anyhow::Error = PipelineError::NoRowsInRange { pos_min: 1, pos_max: 10 }.into();
        assert!(matches!(UnitOutcome::from_error(&skip), UnitOutcome::Skipped(_)));

        // context should not hide the underlying classification
        let wrapped: anyhow::Result<()> = Err(PipelineError::AlreadyProcessed { path: PathBuf::from("m.csv"), marker: "M".to_string() })
            .with_context(|| "Error while processing m.csv:");
        let outcome = UnitOutcome::from_error(&wrapped.unwrap_err());
        assert!(matches!(outcome, UnitOutcome::Skipped(_)));
        assert!(outcome.message().starts_with("Error while processing m.csv:"));

        let failure = anyhow::anyhow!("disk on fire");
        assert_eq!(UnitOutcome::from_error(&failure), UnitOutcome::Failed("disk on fire".to_string()));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::new("coverage");
        summary.extend([
            UnitReport::new("a".to_string(), UnitOutcome::Success("ok".to_string())),
            UnitReport::new("b".to_string(), UnitOutcome::Skipped("exists".to_string())),
            UnitReport::new("c".to_string(), UnitOutcome::Failed("bad".to_string())),
        ]);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.exit_code(), exitcode::OK);
        assert_eq!(summary.units().len(), 3);
    }

    #[test]
    fn test_exit_code_without_success() {
        let mut summary = RunSummary::new("count");
        assert_eq!(summary.exit_code(), exitcode::DATAERR);
        summary.add_report(UnitReport::new("a".to_string(), UnitOutcome::Skipped("exists".to_string())));
        assert_eq!(summary.exit_code(), exitcode::DATAERR);
    }

    #[test]
    fn test_serialize() {
        let report = UnitReport::new("source_dir".to_string(), UnitOutcome::Failed("bad".to_string()));
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"unit":"source_dir","outcome":"failed","message":"bad"}"#);
    }
}
