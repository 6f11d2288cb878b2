
use anyhow::Context;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Returns the sample name for a file, which is everything before the first "."
/// # Examples
/// * `SRR001.variant_filtered.vcf.gz` -> `SRR001`
/// * `SRR001.csv` -> `SRR001`
pub fn sample_stem(filename: &Path) -> Option<String> {
    let name = filename.file_name()?.to_str()?;
    let stem = name.split('.').next()?;
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Lists every file in a folder whose name starts with `prefix` and ends with `suffix`, sorted by name.
/// A missing folder has no matches.
/// # Arguments
/// * `folder` - the folder to scan, not recursive
/// * `prefix` - required start of the file name
/// * `suffix` - required end of the file name
/// # Errors
/// * if the folder exists but cannot be read
pub fn find_matching_files(folder: &Path, prefix: &str, suffix: &str) -> anyhow::Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Ok(vec![]);
    }

    let mut matches = vec![];
    let entries = std::fs::read_dir(folder)
        .with_context(|| format!("Error while reading folder {folder:?}:"))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Error while reading folder {folder:?}:"))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // prefix and suffix cannot overlap, same as a "{prefix}*{suffix}" glob
        if name.len() >= prefix.len() + suffix.len() && name.starts_with(prefix) && name.ends_with(suffix) {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches)
}

/// Returns the sorted, de-duplicated sample stems of all files in a folder that end with `suffix`
/// # Arguments
/// * `folder` - the folder to scan
/// * `suffix` - file name suffix, e.g. ".csv"
pub fn unique_sample_stems(folder: &Path, suffix: &str) -> anyhow::Result<Vec<String>> {
    let stems: BTreeSet<String> = find_matching_files(folder, "", suffix)?
        .iter()
        .filter_map(|p| sample_stem(p))
        .collect();
    Ok(stems.into_iter().collect())
}
