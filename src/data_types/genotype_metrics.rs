
/// FORMAT key for genotype quality
pub const FORMAT_KEY_GQ: &str = "GQ";
/// FORMAT key for read depth
pub const FORMAT_KEY_DP: &str = "DP";

/// Raw GQ/DP strings pulled from the sample column; `None` means the field was absent or unreadable
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawGenotypeMetrics {
    /// Genotype quality, as written
    gq: Option<String>,
    /// Read depth, as written
    dp: Option<String>
}

impl RawGenotypeMetrics {
    /// Constructor
    pub fn new(gq: Option<String>, dp: Option<String>) -> Self {
        Self { gq, dp }
    }

    /// Both values missing, used when extraction fails for a row
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn gq(&self) -> Option<&str> {
        self.gq.as_deref()
    }

    pub fn dp(&self) -> Option<&str> {
        self.dp.as_deref()
    }

    /// Coerces the raw values to numbers; anything non-numeric becomes missing
    pub fn to_numeric(&self) -> GenotypeMetrics {
        GenotypeMetrics {
            gq: self.gq().and_then(coerce_numeric),
            dp: self.dp().and_then(coerce_numeric)
        }
    }
}

/// Numeric genotype metrics, ready for scoring
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenotypeMetrics {
    /// Genotype quality (Phred-scaled)
    pub gq: Option<f64>,
    /// Read depth
    pub dp: Option<f64>
}

/// Parses a cell into a number; empty, `.`, `NA`, `nan`, or any other text gives `None`
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
        .filter(|v| !v.is_nan())
}
