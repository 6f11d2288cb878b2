/// Command line interface functionality
pub mod cli;
/// Core logic for converting genotype metrics into per-variant confidence scores
pub mod confidence_scorer;
/// Core logic for summarizing per-base depth files and merging them into metadata
pub mod coverage_aggregator;
/// Contains various shared data types
pub mod data_types;
/// Counts variants per sample and joins the counts with run metadata
pub mod mutation_counter;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Per-dataset drivers that isolate failures and collect outcomes
pub mod pipeline;
/// Various utility functions that tend to be very generic
pub mod util;
/// Converts VCF files into filtered CSV tables
pub mod vcf_converter;
/// All output writers
pub mod writers;
