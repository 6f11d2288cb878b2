
use indexmap::IndexMap;
use log::warn;

use crate::data_types::genotype_metrics::{RawGenotypeMetrics, FORMAT_KEY_DP, FORMAT_KEY_GQ};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FormatFieldError {
    #[error("FORMAT is empty")]
    EmptyFormat,
    #[error("sample value is empty")]
    EmptySample,
    #[error("FORMAT has {keys} fields, but the sample has {values} values")]
    LengthMismatch { keys: usize, values: usize }
}

/// Pairs each FORMAT key with the sample value at the same position.
/// # Arguments
/// * `format` - colon-delimited keys, e.g. "GT:AD:DP:GQ:PL"
/// * `sample` - colon-delimited values aligned to `format`, e.g. "0/1:3,4:7:30:90,0,60"
/// # Errors
/// * if either string is empty
/// * if the number of keys and values differ
pub fn zip_format_fields<'a>(format: &'a str, sample: &'a str) -> Result<IndexMap<&'a str, &'a str>, FormatFieldError> {
    if format.is_empty() {
        return Err(FormatFieldError::EmptyFormat);
    }
    if sample.is_empty() {
        return Err(FormatFieldError::EmptySample);
    }

    let keys: Vec<&str> = format.split(':').collect();
    let values: Vec<&str> = sample.split(':').collect();
    if keys.len() != values.len() {
        return Err(FormatFieldError::LengthMismatch { keys: keys.len(), values: values.len() });
    }
    Ok(keys.into_iter().zip(values).collect())
}

/// Pulls the raw GQ and DP values for a row.
/// Any extraction problem is logged and both values come back missing, the caller keeps going.
/// # Arguments
/// * `format` - colon-delimited FORMAT keys
/// * `sample` - colon-delimited sample values
pub fn extract_genotype_metrics(format: &str, sample: &str) -> RawGenotypeMetrics {
    match zip_format_fields(format, sample) {
        Ok(fields) => RawGenotypeMetrics::new(
            fields.get(FORMAT_KEY_GQ).map(|v| v.to_string()),
            fields.get(FORMAT_KEY_DP).map(|v| v.to_string())
        ),
        Err(e) => {
            warn!("Error extracting format values from {format:?} / {sample:?}: {e}");
            RawGenotypeMetrics::missing()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_format_fields() {
        let fields = zip_format_fields("GT:AD:DP:GQ:PL", "0/1:3,4:7:30:90,0,60").unwrap();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields.get("GT"), Some(&"0/1"));
        assert_eq!(fields.get("DP"), Some(&"7"));
        assert_eq!(fields.get("GQ"), Some(&"30"));
        assert_eq!(fields.keys().copied().collect::<Vec<_>>(), vec!["GT", "AD", "DP", "GQ", "PL"]);
    }

    #[test]
    fn test_zip_errors() {
        assert_eq!(zip_format_fields("", "0/1"), Err(FormatFieldError::EmptyFormat));
        assert_eq!(zip_format_fields("GT", ""), Err(FormatFieldError::EmptySample));
        assert_eq!(
            zip_format_fields("GT:DP:GQ", "0/1:7"),
            Err(FormatFieldError::LengthMismatch { keys: 3, values: 2 })
        );
    }

    #[test]
    fn test_extract_unordered() {
        // key order in FORMAT does not matter
        let metrics = extract_genotype_metrics("GQ:GT:DP", "45:1/1:12");
        assert_eq!(metrics.gq(), Some("45"));
        assert_eq!(metrics.dp(), Some("12"));
    }

    #[test]
    fn test_extract_absent_keys() {
        let metrics = extract_genotype_metrics("GT:AD", "0/1:3,4");
        assert_eq!(metrics, RawGenotypeMetrics::missing());

        let metrics = extract_genotype_metrics("GT:DP", "0/1:.");
        assert_eq!(metrics.gq(), None);
        assert_eq!(metrics.dp(), Some("."));
    }

    #[test]
    fn test_extract_mismatch() {
        let metrics = extract_genotype_metrics("GT:DP:GQ", "0/1:7");
        assert_eq!(metrics, RawGenotypeMetrics::missing());
    }
}
