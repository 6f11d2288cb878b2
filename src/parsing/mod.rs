/*!
# Parsing module
Contains the logic for parsing input files into meaningful structs / data.
*/
/// Per-base depth tables from the coverage step
pub mod depth_table;
/// Extracts named values from FORMAT/sample column pairs
pub mod format_fields;
/// Loads converted VCF tables into variant records
pub mod variant_table;
/// Opens plain or gzip-compressed VCF text
pub mod vcf_text;
