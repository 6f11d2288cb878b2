/// Per-variant confidence scores, the main output of the confidence step
pub mod confidence_record;
/// Summary statistics accumulated from per-base depth files
pub mod coverage_summary;
/// Path layout for a single dataset directory
pub mod dataset;
/// Genotype metrics pulled out of the FORMAT/sample columns
pub mod genotype_metrics;
/// Outcome tracking for each processed unit and the overall run
pub mod outcome;
/// Shared error taxonomy for the pipeline stages
pub mod pipeline_error;
/// Inclusive genomic coordinate ranges
pub mod position_range;
/// Detects whether a table was already processed by a stage
pub mod processing_status;
/// Generic in-memory CSV table with left-join support
pub mod table;
/// Contains the variant row definition parsed from converted VCF tables
pub mod variant_record;
