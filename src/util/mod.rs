/// Helpers for finding input files and deriving sample names from them
pub mod file_discovery;
/// Helper functions for writing JSON via serde
pub mod json_io;
/// Helper functions for generating the progress bars
pub mod progress_bar;
