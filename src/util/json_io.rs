
use anyhow::Context;
use std::io::Write;
use std::path::Path;

use crate::writers::atomic_file::write_atomically;

/// This will save a generic serializable struct to JSON.
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to; ".gz" outputs get compressed
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> anyhow::Result<()> {
    let is_compressed = out_filename.extension().unwrap_or_default() == "gz";
    write_atomically(out_filename, |writer| {
        if is_compressed {
            let mut encoder = flate2::write::GzEncoder::new(writer, flate2::Compression::best());
            serde_json::to_writer_pretty(&mut encoder, data)
                .with_context(|| format!("Error while serializing {out_filename:?}:"))?;
            encoder.finish()?.flush()?;
        } else {
            serde_json::to_writer_pretty(&mut *writer, data)
                .with_context(|| format!("Error while serializing {out_filename:?}:"))?;
        }
        Ok(())
    })
}
