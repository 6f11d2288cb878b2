/*!
# Writers module
Contains the logic for writing the output tables for each stage.
All outputs go through `atomic_file`, so a partially written table never replaces a valid one.
*/
/// Write-to-temporary-then-rename wrapper for all output files
pub mod atomic_file;
/// Writes the per-variant confidence table
pub mod confidence_table;
/// Writes generic string tables (metadata, counts, backups)
pub mod table_writer;

use std::path::Path;

/// Picks the delimiter from the file extension: "," for .csv, tab for everything else
/// # Arguments
/// * `filename` - the path of the file being read or written
pub fn delimiter_for(filename: &Path) -> u8 {
    let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
    if is_csv { b',' } else { b'\t' }
}
