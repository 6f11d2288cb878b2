
use anyhow::Context;
use log::trace;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes a file by first writing everything to a temporary file in the same folder, and then renaming it into place.
/// If `write_fn` fails, the temporary file is removed and `destination` is left untouched.
/// # Arguments
/// * `destination` - the final path of the file
/// * `write_fn` - writes the full content to the provided handle
/// # Errors
/// * if the temporary file cannot be created in the destination folder
/// * if `write_fn` returns an error
/// * if flushing or renaming fails
pub fn write_atomically<T, F>(destination: &Path, write_fn: F) -> anyhow::Result<T>
where
    F: FnOnce(&mut dyn Write) -> anyhow::Result<T>
{
    // the rename is only atomic within a single filesystem, so stay in the same folder
    let parent: PathBuf = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from(".")
    };
    let mut temp_file = NamedTempFile::new_in(&parent)
        .with_context(|| format!("Error while creating temporary file in {parent:?}:"))?;
    trace!("Writing {destination:?} via {:?}", temp_file.path());

    let result = {
        let mut buf_writer = BufWriter::new(temp_file.as_file_mut());
        let result = write_fn(&mut buf_writer)
            .with_context(|| format!("Error while writing {destination:?}:"))?;
        buf_writer.flush()
            .with_context(|| format!("Error while flushing output to {destination:?}:"))?;
        result
    };
    temp_file.as_file().sync_all()
        .with_context(|| format!("Error while syncing output to {destination:?}:"))?;

    temp_file.persist(destination)
        .map_err(|e| e.error)
        .with_context(|| format!("Error while moving output into place at {destination:?}:"))?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[test]
    fn test_write_and_replace() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("out.csv");
        std::fs::write(&filename, "old content\n").unwrap();

        let lines = write_atomically(&filename, |w| {
            writeln!(w, "a,b")?;
            writeln!(w, "1,2")?;
            Ok(2)
        }).unwrap();
        assert_eq!(lines, 2);
        assert_eq!(std::fs::read_to_string(&filename).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn test_failure_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("out.csv");
        std::fs::write(&filename, "old content\n").unwrap();

        let result: anyhow::Result<()> = write_atomically(&filename, |w| {
            writeln!(w, "partial")?;
            bail!("simulated failure");
        });
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&filename).unwrap(), "old content\n");

        // no temporary files left behind
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
