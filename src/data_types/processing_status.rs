
use serde::Serialize;

/// Whether a table has already been through a stage, inferred from its columns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum ProcessingStatus {
    /// None of the stage's columns are present
    #[strum(serialize = "not_started")]
    NotStarted,
    /// Every column of at least one marker set is present
    #[strum(serialize = "completed")]
    Completed,
    /// Some stage columns are present, but no marker set is complete; e.g., a prior run was cut short or columns were hand-edited
    #[strum(serialize = "corrupt_partial")]
    CorruptPartial
}

impl ProcessingStatus {
    /// Infers the status from a set of column names.
    /// # Arguments
    /// * `headers` - the column names of the table
    /// * `marker_sets` - column sets that are only written together by a complete run; any one of them being fully present means the stage completed
    /// * `is_stage_column` - returns true for any column that the stage writes
    pub fn from_headers<S, F>(headers: &[S], marker_sets: &[Vec<String>], is_stage_column: F) -> Self
    where
        S: AsRef<str>,
        F: Fn(&str) -> bool
    {
        if completed_marker_set(headers, marker_sets).is_some() {
            ProcessingStatus::Completed
        } else if headers.iter().any(|h| is_stage_column(h.as_ref())) {
            ProcessingStatus::CorruptPartial
        } else {
            ProcessingStatus::NotStarted
        }
    }
}

/// Returns the first non-empty marker set whose columns are all in `headers`
pub fn completed_marker_set<'a, S: AsRef<str>>(headers: &[S], marker_sets: &'a [Vec<String>]) -> Option<&'a [String]> {
    marker_sets.iter()
        .find(|set| !set.is_empty() && set.iter().all(|m| headers.iter().any(|h| h.as_ref() == m)))
        .map(|set| set.as_slice())
}
