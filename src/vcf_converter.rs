/*!
# VCF Converter
Converts per-sample VCF files into CSV tables that the counting and scoring stages consume.
Only rows on the target chromosome are kept, and reference blocks (ALT is exactly `<NON_REF>`) are dropped.
*/
use anyhow::bail;
use log::{debug, trace, warn};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::parsing::vcf_text::open_vcf_text;
use crate::writers::atomic_file::write_atomically;
use crate::writers::delimiter_for;

/// The placeholder ALT allele used by gVCF reference blocks
pub const NON_REF_ALLELE: &str = "<NON_REF>";
/// Default chromosome to keep
pub const DEFAULT_CHROM: &str = "chr11";
/// Expected suffix of the per-sample VCF files
pub const VCF_FILE_SUFFIX: &str = ".variant_filtered.vcf.gz";

/// Header line prefix; the leading "#" gets dropped from the column name
const HEADER_PREFIX: &str = "#CHROM";
const META_PREFIX: &str = "##";
/// CHROM and ALT positions in a VCF data line
const CHROM_INDEX: usize = 0;
const ALT_INDEX: usize = 4;

/// Row counts from a single conversion
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Rows written to the output
    pub kept: u64,
    /// Rows on some other chromosome
    pub other_chrom: u64,
    /// Rows with a `<NON_REF>` ALT on the target chromosome
    pub non_ref: u64,
    /// Rows with a different number of fields than the header
    pub malformed: u64
}

/// Returns the VCF for a sample stem in a folder; e.g. `SRR001` -> `{folder}/SRR001.variant_filtered.vcf.gz`
pub fn vcf_path_for(folder: &Path, stem: &str) -> PathBuf {
    folder.join(format!("{stem}{VCF_FILE_SUFFIX}"))
}

/// Streams VCF text into a delimited table, filtering as it goes.
/// # Arguments
/// * `reader` - VCF text, meta lines included
/// * `writer` - destination for the table
/// * `delimiter` - output field delimiter
/// * `chrom` - the chromosome to keep
/// * `source` - path used in messages
/// # Errors
/// * if no `#CHROM` header line is found, or a data line comes before it
/// * if reading or writing fails
pub fn convert_vcf_reader<R: BufRead, W: Write>(reader: R, writer: W, delimiter: u8, chrom: &str, source: &Path) -> anyhow::Result<ConversionStats> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    let mut num_columns: Option<usize> = None;
    let mut stats = ConversionStats::default();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() || line.starts_with(META_PREFIX) {
            continue;
        }

        let Some(expected) = num_columns else {
            if !line.starts_with(HEADER_PREFIX) {
                bail!("Data on line {} of {source:?} appears before the {HEADER_PREFIX} header", i + 1);
            }
            let header: Vec<&str> = line.split('\t')
                .enumerate()
                .map(|(j, name)| if j == CHROM_INDEX { &HEADER_PREFIX[1..] } else { name })
                .collect();
            csv_writer.write_record(&header)?;
            num_columns = Some(header.len());
            continue;
        };

        if line.starts_with('#') {
            trace!("Ignoring extra header line {} in {source:?}", i + 1);
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != expected {
            warn!("Skipping line {} of {source:?}: expected {expected} fields, found {}", i + 1, fields.len());
            stats.malformed += 1;
        } else if fields[CHROM_INDEX] != chrom {
            stats.other_chrom += 1;
        } else if fields[ALT_INDEX] == NON_REF_ALLELE {
            stats.non_ref += 1;
        } else {
            csv_writer.write_record(&fields)?;
            stats.kept += 1;
        }
    }

    if num_columns.is_none() {
        bail!("Could not find {HEADER_PREFIX} header in {source:?}");
    }
    csv_writer.flush()?;
    Ok(stats)
}

/// Converts a VCF(.gz) into a table, replacing the output atomically.
/// Nothing is written if the conversion fails.
/// # Arguments
/// * `vcf_fn` - the input VCF, gzip-compressed if it ends in ".gz"
/// * `output_fn` - the output table; the delimiter follows the extension
/// * `chrom` - the chromosome to keep
pub fn convert_vcf_file(vcf_fn: &Path, output_fn: &Path, chrom: &str) -> anyhow::Result<ConversionStats> {
    debug!("Converting {vcf_fn:?} to {output_fn:?}...");
    let reader = open_vcf_text(vcf_fn)?;
    let delimiter = delimiter_for(output_fn);
    write_atomically(output_fn, |writer| {
        convert_vcf_reader(reader, writer, delimiter, chrom, vcf_fn)
    })
}
