/*!
# CLI module
Command line interface functionality that is specific to varsift.
*/

/// The main CLI module that contains the top-level CLI parser, help text, and shared dataset options
pub mod core;
/// The confidence CLI subcommand
pub mod confidence;
/// The convert CLI subcommand
pub mod convert;
/// The count CLI subcommand
pub mod count;
/// The coverage CLI subcommand
pub mod coverage;
