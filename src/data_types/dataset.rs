
use std::path::{Path, PathBuf};

use crate::data_types::pipeline_error::PipelineError;

/// Prefix shared by every dataset directory name
const DATASET_PREFIX: &str = "source_dir";

/// Wrapper for all the paths used by the stages for a single dataset directory.
/// A dataset `source_dir` has suffix `ds1`, and `source_dir_N` has suffix `dsN`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetLayout {
    /// Name of the dataset directory, relative to the base path
    name: String,
    /// The short suffix used in output file names; e.g. "ds4"
    suffix: String,
    /// Full path to the dataset directory
    root: PathBuf
}

impl DatasetLayout {
    /// Constructor
    /// # Arguments
    /// * `base_path` - the base project folder
    /// * `name` - the dataset directory name
    /// # Errors
    /// * if the name does not follow the `source_dir[_N]` convention
    pub fn new(base_path: &Path, name: &str) -> Result<Self, PipelineError> {
        let suffix = dataset_suffix(name)
            .ok_or_else(|| PipelineError::UnknownDataset { name: name.to_string() })?;
        Ok(Self {
            name: name.to_string(),
            suffix,
            root: base_path.join(name)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder with the filtered VCFs and most derived outputs
    pub fn filtered_dir(&self) -> PathBuf {
        self.root.join("filtered")
    }

    /// Folder with the per-sample CSV conversions
    pub fn csv_dir(&self) -> PathBuf {
        self.filtered_dir().join("csv_files")
    }

    /// Folder for the confidence tables
    pub fn confidence_dir(&self) -> PathBuf {
        self.root.join("Confidence")
    }

    /// Folder with the per-base depth files
    pub fn depth_dir(&self) -> PathBuf {
        self.root.join("pass2")
    }

    /// The SRA run table with the sample metadata
    pub fn sra_table(&self) -> PathBuf {
        self.filtered_dir().join("srainfo").join("SraRunTable.csv")
    }

    /// The mutation count + metadata table, also the target for coverage
    pub fn metadata_table(&self) -> PathBuf {
        self.filtered_dir().join(format!("mutation_counts_metadata_{}.csv", self.suffix))
    }
}

/// Maps a dataset directory name to its suffix, if it follows the naming convention
fn dataset_suffix(name: &str) -> Option<String> {
    if name == DATASET_PREFIX {
        return Some("ds1".to_string());
    }
    let number = name.strip_prefix(DATASET_PREFIX)?.strip_prefix('_')?;
    if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
        Some(format!("ds{number}"))
    } else {
        None
    }
}
