
use serde::Serialize;

/// Output columns of a confidence table, in order
pub const CONFIDENCE_COLUMNS: [&str; 9] = ["POS", "GQ", "QUAL", "DP", "gq_conf", "qual_conf", "dp_conf", "confidence", "FILTER"];

/// One scored variant; every numeric value is optional and missing values are written as empty cells
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfidenceRecord {
    /// 1-based coordinate
    #[serde(rename = "POS")]
    pub position: u64,
    /// Genotype quality
    #[serde(rename = "GQ")]
    pub gq: Option<f64>,
    /// Call quality, uncapped
    #[serde(rename = "QUAL")]
    pub qual: Option<f64>,
    /// Read depth
    #[serde(rename = "DP")]
    pub dp: Option<f64>,
    /// Phred transform of GQ
    pub gq_conf: Option<f64>,
    /// Phred transform of the capped QUAL
    pub qual_conf: Option<f64>,
    /// Logistic transform of DP
    pub dp_conf: Option<f64>,
    /// Weighted combination of the three, missing if any component is missing
    pub confidence: Option<f64>,
    /// Passed through from the input
    #[serde(rename = "FILTER")]
    pub filter: String
}
