
/// The fixed columns of a VCF body, in order; anything after these is a sample column
pub const VCF_FIXED_COLUMNS: [&str; 9] = ["CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT"];

pub const COLUMN_CHROM: &str = "CHROM";
pub const COLUMN_POS: &str = "POS";
pub const COLUMN_ID: &str = "ID";
pub const COLUMN_REF: &str = "REF";
pub const COLUMN_ALT: &str = "ALT";
pub const COLUMN_QUAL: &str = "QUAL";
pub const COLUMN_FILTER: &str = "FILTER";
pub const COLUMN_INFO: &str = "INFO";
pub const COLUMN_FORMAT: &str = "FORMAT";

/// A single row from a converted VCF table.
/// Columns that were absent from the table are stored as empty strings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VariantRecord {
    /// Chromosome name
    pub chrom: String,
    /// 1-based coordinate of the variant
    pub position: u64,
    /// Variant identifier, usually "."
    pub id: String,
    /// Reference allele
    pub reference: String,
    /// Alternate allele(s)
    pub alternate: String,
    /// Call quality; missing for "." or any non-numeric value
    pub quality: Option<f64>,
    /// FILTER column, passed through to outputs
    pub filter: String,
    /// INFO column
    pub info: String,
    /// Colon-delimited FORMAT keys
    pub format: String,
    /// Colon-delimited sample values, aligned to `format`
    pub sample_value: String
}

impl VariantRecord {
    /// Constructor for the fields that drive scoring; everything else is left empty
    /// # Arguments
    /// * `position` - 1-based coordinate
    /// * `quality` - the QUAL value, if present
    /// * `filter` - the FILTER value
    /// * `format` - the FORMAT keys, e.g. "GT:AD:DP:GQ:PL"
    /// * `sample_value` - the sample values aligned to `format`
    pub fn new(position: u64, quality: Option<f64>, filter: &str, format: &str, sample_value: &str) -> Self {
        Self {
            position,
            quality,
            filter: filter.to_string(),
            format: format.to_string(),
            sample_value: sample_value.to_string(),
            ..Default::default()
        }
    }
}
