/*!
# Confidence Scorer
Converts the genotype quality (GQ), call quality (QUAL), and read depth (DP) of each variant into a single confidence value in [0, 1].
Each metric goes through its own transform, and the three transforms are combined with fixed weights:
* `gq_conf = 1 - 10^(-GQ/10)`
* `qual_conf = 1 - 10^(-min(QUAL, 50)/10)`
* `dp_conf = 1 / (1 + e^(-0.22 * (DP - 20)))`
* `confidence = 0.4 * gq_conf + 0.4 * qual_conf + 0.2 * dp_conf`

If any of the three inputs is missing, the combined confidence is missing as well; the remaining components are not re-weighted.

## Example usage
```rust
use approx_eq::assert_approx_eq;
use varsift::confidence_scorer::{score_variant, ScoringConfig, ScoringConfigBuilder};
use varsift::data_types::variant_record::VariantRecord;

let variant = VariantRecord::new(68000000, Some(60.0), "PASS", "GT:DP:GQ", "0/1:20:30");
let scored = score_variant(&variant, &ScoringConfig::default());
assert_approx_eq!(scored.gq_conf.unwrap(), 0.999);
assert_approx_eq!(scored.qual_conf.unwrap(), 0.99999);
assert_approx_eq!(scored.dp_conf.unwrap(), 0.5);
assert_approx_eq!(scored.confidence.unwrap(), 0.899596);

// weights must always sum to 1.0
assert!(ScoringConfigBuilder::default().gq_weight(0.5).build().is_err());
```
*/
use anyhow::Context;
use derive_builder::Builder;
use log::{debug, info};
use serde::Serialize;
use std::path::Path;

use crate::data_types::confidence_record::ConfidenceRecord;
use crate::data_types::pipeline_error::PipelineError;
use crate::data_types::position_range::PositionRange;
use crate::data_types::variant_record::VariantRecord;
use crate::parsing::format_fields::extract_genotype_metrics;
use crate::parsing::variant_table::VariantTable;
use crate::writers::confidence_table::write_confidence_table;

pub const DEFAULT_GQ_WEIGHT: f64 = 0.4;
pub const DEFAULT_QUAL_WEIGHT: f64 = 0.4;
pub const DEFAULT_DP_WEIGHT: f64 = 0.2;
/// QUAL values above this are clamped before the transform
pub const DEFAULT_QUAL_CAP: f64 = 50.0;
/// DP where `dp_conf` is exactly 0.5
pub const DEFAULT_DP_CENTER: f64 = 20.0;
/// Steepness of the DP logistic curve
pub const DEFAULT_DP_SLOPE: f64 = 0.22;
/// Allowed floating error when checking the weights sum to 1.0
const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Controls the transforms and the weighted combination
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ScoringConfig {
    /// weight on the GQ component
    #[builder(default = "DEFAULT_GQ_WEIGHT")]
    gq_weight: f64,
    /// weight on the QUAL component
    #[builder(default = "DEFAULT_QUAL_WEIGHT")]
    qual_weight: f64,
    /// weight on the DP component
    #[builder(default = "DEFAULT_DP_WEIGHT")]
    dp_weight: f64,
    /// QUAL ceiling applied before the transform
    #[builder(default = "DEFAULT_QUAL_CAP")]
    qual_cap: f64,
    /// center of the DP logistic curve
    #[builder(default = "DEFAULT_DP_CENTER")]
    dp_center: f64,
    /// slope of the DP logistic curve, must be > 0
    #[builder(default = "DEFAULT_DP_SLOPE")]
    dp_slope: f64
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            gq_weight: DEFAULT_GQ_WEIGHT,
            qual_weight: DEFAULT_QUAL_WEIGHT,
            dp_weight: DEFAULT_DP_WEIGHT,
            qual_cap: DEFAULT_QUAL_CAP,
            dp_center: DEFAULT_DP_CENTER,
            dp_slope: DEFAULT_DP_SLOPE
        }
    }
}

impl ScoringConfigBuilder {
    /// Weights must be non-negative and sum to 1.0; the curve parameters must be finite
    fn validate(&self) -> Result<(), String> {
        let weights = [
            self.gq_weight.unwrap_or(DEFAULT_GQ_WEIGHT),
            self.qual_weight.unwrap_or(DEFAULT_QUAL_WEIGHT),
            self.dp_weight.unwrap_or(DEFAULT_DP_WEIGHT)
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(format!("weights must be finite and non-negative, found {weights:?}"));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(format!("weights must sum to 1.0, found {total}"));
        }

        let qual_cap = self.qual_cap.unwrap_or(DEFAULT_QUAL_CAP);
        let dp_center = self.dp_center.unwrap_or(DEFAULT_DP_CENTER);
        let dp_slope = self.dp_slope.unwrap_or(DEFAULT_DP_SLOPE);
        if !qual_cap.is_finite() || !dp_center.is_finite() {
            return Err("qual_cap and dp_center must be finite".to_string());
        }
        if !dp_slope.is_finite() || dp_slope <= 0.0 {
            return Err(format!("dp_slope must be > 0, found {dp_slope}"));
        }
        Ok(())
    }
}

impl ScoringConfig {
    // mostly getters
    pub fn gq_weight(&self) -> f64 {
        self.gq_weight
    }

    pub fn qual_weight(&self) -> f64 {
        self.qual_weight
    }

    pub fn dp_weight(&self) -> f64 {
        self.dp_weight
    }

    pub fn qual_cap(&self) -> f64 {
        self.qual_cap
    }

    /// Phred transform of the genotype quality
    pub fn gq_confidence(&self, gq: Option<f64>) -> Option<f64> {
        gq.map(phred_confidence)
    }

    /// Phred transform of the call quality after capping it
    pub fn qual_confidence(&self, qual: Option<f64>) -> Option<f64> {
        qual.map(|q| phred_confidence(q.min(self.qual_cap)))
    }

    /// Logistic transform of the read depth
    pub fn dp_confidence(&self, dp: Option<f64>) -> Option<f64> {
        dp.map(|d| 1.0 / (1.0 + (-self.dp_slope * (d - self.dp_center)).exp()))
    }

    /// Weighted combination; missing if any component is missing
    pub fn combine(&self, gq_conf: Option<f64>, qual_conf: Option<f64>, dp_conf: Option<f64>) -> Option<f64> {
        match (gq_conf, qual_conf, dp_conf) {
            (Some(g), Some(q), Some(d)) => Some(self.gq_weight * g + self.qual_weight * q + self.dp_weight * d),
            _ => None
        }
    }
}

/// Converts a Phred-scaled score into the probability the call is correct; i.e. `1 - 10^(-score/10)`
pub fn phred_confidence(score: f64) -> f64 {
    1.0 - 10.0_f64.powf(-score / 10.0)
}

/// Scores a single variant
/// # Arguments
/// * `record` - the variant with its FORMAT/sample values
/// * `config` - the scoring parameters
pub fn score_variant(record: &VariantRecord, config: &ScoringConfig) -> ConfidenceRecord {
    let metrics = extract_genotype_metrics(&record.format, &record.sample_value).to_numeric();
    let gq_conf = config.gq_confidence(metrics.gq);
    let qual_conf = config.qual_confidence(record.quality);
    let dp_conf = config.dp_confidence(metrics.dp);
    ConfidenceRecord {
        position: record.position,
        gq: metrics.gq,
        qual: record.quality,
        dp: metrics.dp,
        gq_conf,
        qual_conf,
        dp_conf,
        confidence: config.combine(gq_conf, qual_conf, dp_conf),
        filter: record.filter.clone()
    }
}

/// The scored variants for one table
#[derive(Clone, Debug)]
pub struct ScoredVariants {
    /// One record per in-range input row, in input order
    records: Vec<ConfidenceRecord>,
    /// Number of parsed rows outside of the range
    out_of_range: usize,
    /// Number of rows that were dropped before scoring because they could not be parsed
    malformed: usize
}

impl ScoredVariants {
    pub fn records(&self) -> &[ConfidenceRecord] {
        &self.records
    }

    pub fn out_of_range(&self) -> usize {
        self.out_of_range
    }

    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Number of scored rows where the combined confidence is missing
    pub fn missing_confidence(&self) -> usize {
        self.records.iter().filter(|r| r.confidence.is_none()).count()
    }
}

/// Scores every variant of a table that falls within the range, both ends included.
/// # Arguments
/// * `table` - the loaded variants
/// * `range` - the inclusive position range to keep
/// * `config` - the scoring parameters
/// # Errors
/// * `PipelineError::NoRowsInRange` if nothing is left after the range filter
pub fn score_variants(table: &VariantTable, range: PositionRange, config: &ScoringConfig) -> Result<ScoredVariants, PipelineError> {
    let records: Vec<ConfidenceRecord> = table.records().iter()
        .filter(|r| range.contains(r.position))
        .map(|r| score_variant(r, config))
        .collect();

    if records.is_empty() {
        return Err(PipelineError::NoRowsInRange { pos_min: range.min(), pos_max: range.max() });
    }

    let out_of_range = table.records().len() - records.len();
    Ok(ScoredVariants {
        records,
        out_of_range,
        malformed: table.malformed_rows().len()
    })
}

/// Loads a converted VCF table, scores it, and writes the confidence table
/// # Arguments
/// * `input_fn` - the converted VCF table
/// * `output_fn` - where the confidence table goes
/// * `range` - the inclusive position range to keep
/// * `config` - the scoring parameters
/// # Errors
/// * if the input is missing required columns or cannot be read
/// * if no rows fall in the range; nothing gets written in that case
/// * if the output cannot be written
pub fn score_file(input_fn: &Path, output_fn: &Path, range: PositionRange, config: &ScoringConfig) -> anyhow::Result<ScoredVariants> {
    debug!("Reading {input_fn:?}...");
    let table = VariantTable::from_path(input_fn)?;
    let scored = score_variants(&table, range, config)
        .with_context(|| format!("Error while scoring {input_fn:?}:"))?;
    info!(
        "Scored {} variants from {:?} ({} outside range, {} malformed, {} missing confidence)",
        scored.records().len(), input_fn, scored.out_of_range(), scored.malformed(), scored.missing_confidence()
    );
    write_confidence_table(scored.records(), output_fn)?;
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use std::io::Cursor;

    fn default_config() -> ScoringConfig {
        ScoringConfig::default()
    }

    #[test]
    fn test_default_builder() {
        let built = ScoringConfigBuilder::default().build().unwrap();
        assert_eq!(built, ScoringConfig::default());
        assert_approx_eq!(built.gq_weight() + built.qual_weight() + built.dp_weight(), 1.0);
        assert_eq!(built.qual_cap(), 50.0);
    }

    #[test]
    fn test_builder_validation() {
        assert!(ScoringConfigBuilder::default().dp_weight(0.3).build().is_err());
        assert!(ScoringConfigBuilder::default().gq_weight(-0.1).qual_weight(0.9).build().is_err());
        assert!(ScoringConfigBuilder::default().dp_slope(0.0).build().is_err());
        let custom = ScoringConfigBuilder::default()
            .gq_weight(0.5)
            .qual_weight(0.3)
            .build()
            .unwrap();
        assert_approx_eq!(custom.dp_weight(), 0.2);
    }

    #[test]
    fn test_gq_confidence() {
        let config = default_config();
        assert_eq!(config.gq_confidence(Some(0.0)), Some(0.0));
        assert_approx_eq!(config.gq_confidence(Some(10.0)).unwrap(), 0.9);
        assert_approx_eq!(config.gq_confidence(Some(30.0)).unwrap(), 0.999);
        assert_eq!(config.gq_confidence(None), None);

        // strictly increasing, and stays below 1 for finite scores
        let mut previous = -1.0;
        for gq in 0..=99 {
            let conf = config.gq_confidence(Some(gq as f64)).unwrap();
            assert!(conf > previous);
            assert!((0.0..1.0).contains(&conf));
            previous = conf;
        }
        assert_approx_eq!(config.gq_confidence(Some(1000.0)).unwrap(), 1.0);
    }

    #[test]
    fn test_qual_cap() {
        let config = default_config();
        let at_cap = config.qual_confidence(Some(50.0)).unwrap();
        assert_eq!(config.qual_confidence(Some(60.0)).unwrap(), at_cap);
        assert_eq!(config.qual_confidence(Some(1000.0)).unwrap(), at_cap);
        assert_approx_eq!(at_cap, 0.99999);
        assert!(config.qual_confidence(Some(49.0)).unwrap() < at_cap);
        assert_eq!(config.qual_confidence(None), None);
    }

    #[test]
    fn test_dp_confidence() {
        let config = default_config();
        assert_eq!(config.dp_confidence(Some(20.0)), Some(0.5));
        assert!(config.dp_confidence(Some(10.0)).unwrap() < 0.5);
        assert!(config.dp_confidence(Some(30.0)).unwrap() > 0.5);
        assert!(config.dp_confidence(Some(-1000.0)).unwrap() < 1e-50);
        assert_approx_eq!(config.dp_confidence(Some(1000.0)).unwrap(), 1.0);

        let mut previous = 0.0;
        for dp in 0..200 {
            let conf = config.dp_confidence(Some(dp as f64)).unwrap();
            assert!(conf > previous);
            previous = conf;
        }
        assert_eq!(config.dp_confidence(None), None);
    }

    #[test]
    fn test_combine_missing() {
        let config = default_config();
        assert_approx_eq!(config.combine(Some(1.0), Some(0.5), Some(0.0)).unwrap(), 0.6);
        assert_eq!(config.combine(None, Some(0.5), Some(0.5)), None);
        assert_eq!(config.combine(Some(0.5), None, Some(0.5)), None);
        assert_eq!(config.combine(Some(0.5), Some(0.5), None), None);
    }

    #[test]
    fn test_score_variant() {
        let variant = VariantRecord::new(68000000, Some(60.0), "PASS", "GT:AD:DP:GQ:PL", "0/1:10,10:20:30:90,0,90");
        let scored = score_variant(&variant, &default_config());
        assert_eq!(scored.position, 68000000);
        assert_eq!(scored.gq, Some(30.0));
        assert_eq!(scored.qual, Some(60.0));
        assert_eq!(scored.dp, Some(20.0));
        assert_approx_eq!(scored.gq_conf.unwrap(), 0.999);
        assert_approx_eq!(scored.qual_conf.unwrap(), 0.99999);
        assert_approx_eq!(scored.dp_conf.unwrap(), 0.5);
        // 0.4 * 0.999 + 0.4 * 0.99999 + 0.2 * 0.5
        assert_approx_eq!(scored.confidence.unwrap(), 0.899596);
        assert_eq!(scored.filter, "PASS");
    }

    #[test]
    fn test_score_variant_missing_metrics() {
        // mismatched FORMAT/sample gives missing GQ and DP, but the row is still scored
        let variant = VariantRecord::new(5, Some(40.0), "PASS", "GT:DP:GQ", "0/1:7");
        let scored = score_variant(&variant, &default_config());
        assert_eq!(scored.gq, None);
        assert_eq!(scored.dp, None);
        assert!(scored.qual_conf.is_some());
        assert_eq!(scored.confidence, None);

        // a zero GQ is a real value
        let variant = VariantRecord::new(5, Some(40.0), "PASS", "GT:DP:GQ", "0/1:7:0");
        let scored = score_variant(&variant, &default_config());
        assert_eq!(scored.gq_conf, Some(0.0));
        assert!(scored.confidence.is_some());
    }

    #[test]
    fn test_score_variants_range() {
        let content = "CHROM,POS,ID,REF,ALT,QUAL,FILTER,INFO,FORMAT,S1
chr11,99,.,A,G,30,PASS,.,GT:DP:GQ,0/1:20:30
chr11,100,.,A,G,30,PASS,.,GT:DP:GQ,0/1:20:30
chr11,150,.,A,G,30,PASS,.,GT:DP:GQ,0/1:20:30
chr11,200,.,A,G,30,PASS,.,GT:DP:GQ,0/1:20:30
chr11,201,.,A,G,30,PASS,.,GT:DP:GQ,0/1:20:30
chr11,bad,.,A,G,30,PASS,.,GT:DP:GQ,0/1:20:30
";
        let table = VariantTable::from_reader(Cursor::new(content), b',', "S1", Path::new("S1.csv")).unwrap();
        let range = PositionRange::new(100, 200).unwrap();
        let scored = score_variants(&table, range, &default_config()).unwrap();
        let positions: Vec<u64> = scored.records().iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![100, 150, 200]);
        assert_eq!(scored.out_of_range(), 2);
        assert_eq!(scored.malformed(), 1);
        assert_eq!(scored.missing_confidence(), 0);

        let empty_range = PositionRange::new(1000, 2000).unwrap();
        let error = score_variants(&table, empty_range, &default_config()).unwrap_err();
        assert!(matches!(error, PipelineError::NoRowsInRange { pos_min: 1000, pos_max: 2000 }));
    }

    #[test]
    fn test_score_file() {
        let dir = tempfile::tempdir().unwrap();
        let input_fn = Path::new("test_data/variants/SRR200.csv");
        let output_fn = dir.path().join("SRR200_confidence.csv");
        let range = PositionRange::new(67990100, 68005097).unwrap();

        let scored = score_file(input_fn, &output_fn, range, &default_config()).unwrap();
        assert_eq!(scored.records().len(), 3);
        assert_eq!(scored.out_of_range(), 1);
        assert_eq!(scored.missing_confidence(), 1);

        let content = std::fs::read_to_string(&output_fn).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "POS,GQ,QUAL,DP,gq_conf,qual_conf,dp_conf,confidence,FILTER");
        assert!(lines[1].starts_with("67995000,30.0,60.0,20.0,"));
        assert!(lines[3].ends_with(",,LowQual"));
    }

    #[test]
    fn test_score_file_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input_fn = Path::new("test_data/variants/SRR200.csv");
        let output_fn = dir.path().join("SRR200_confidence.csv");
        let range = PositionRange::new(1, 10).unwrap();

        let error = score_file(input_fn, &output_fn, range, &default_config()).unwrap_err();
        assert!(matches!(error.downcast_ref::<PipelineError>(), Some(PipelineError::NoRowsInRange { .. })));
        assert!(!output_fn.exists());
    }
}
