
use std::path::Path;

use crate::data_types::table::Table;
use crate::writers::atomic_file::write_atomically;

/// Writes a full table, including the header row, replacing any existing file atomically
/// # Arguments
/// * `table` - the table to save
/// * `filename` - the output path
/// * `delimiter` - the field delimiter; see `delimiter_for(...)`
pub fn write_table(table: &Table, filename: &Path, delimiter: u8) -> anyhow::Result<()> {
    write_atomically(filename, |writer| {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        csv_writer.write_record(table.headers())?;
        for row in table.rows().iter() {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    })
}
