
use std::path::PathBuf;

/// Domain errors that a pipeline unit (file, sample, or dataset) can report.
/// I/O problems are carried separately through `anyhow` context chains.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("{label} does not exist: {path:?}")]
    MissingInput { label: String, path: PathBuf },
    #[error("required column \"{column}\" is missing from {path:?}")]
    MissingColumn { column: String, path: PathBuf },
    #[error("could not identify a sample column in {path:?}")]
    NoSampleColumn { path: PathBuf },
    #[error("no positions within range {pos_min}-{pos_max}")]
    NoRowsInRange { pos_min: u64, pos_max: u64 },
    #[error("no samples were collected from {path:?}")]
    NoSamples { path: PathBuf },
    #[error("process previously done, {path:?} already contains \"{marker}\"")]
    AlreadyProcessed { path: PathBuf, marker: String },
    #[error("output already exists: {path:?}")]
    OutputExists { path: PathBuf },
    #[error("no coverage files found for any sample in {path:?}")]
    NoCoverageFiles { path: PathBuf },
    #[error("unknown dataset directory: \"{name}\"")]
    UnknownDataset { name: String }
}

impl PipelineError {
    /// Returns true if this error means "nothing to do" rather than a failure.
    /// Skips are reported, but they never count against the unit.
    pub fn is_skip(&self) -> bool {
        match self {
            PipelineError::NoRowsInRange { .. } |
            PipelineError::AlreadyProcessed { .. } |
            PipelineError::OutputExists { .. } => true,

            PipelineError::MissingInput { .. } |
            PipelineError::MissingColumn { .. } |
            PipelineError::NoSampleColumn { .. } |
            PipelineError::NoSamples { .. } |
            PipelineError::NoCoverageFiles { .. } |
            PipelineError::UnknownDataset { .. } => false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_classification() {
        assert!(PipelineError::NoRowsInRange { pos_min: 1, pos_max: 2 }.is_skip());
        assert!(PipelineError::AlreadyProcessed { path: PathBuf::from("a.csv"), marker: "X".to_string() }.is_skip());
        assert!(!PipelineError::NoCoverageFiles { path: PathBuf::from("dir") }.is_skip());
        assert!(!PipelineError::MissingColumn { column: "POS".to_string(), path: PathBuf::from("a.csv") }.is_skip());
    }

    #[test]
    fn test_messages() {
        let error = PipelineError::NoRowsInRange { pos_min: 67990100, pos_max: 68005097 };
        assert_eq!(error.to_string(), "no positions within range 67990100-68005097");
        let error = PipelineError::UnknownDataset { name: "other".to_string() };
        assert_eq!(error.to_string(), "unknown dataset directory: \"other\"");
    }
}
