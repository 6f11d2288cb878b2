
use anyhow::Context;
use itertools::{Either, Itertools};
use log::{debug, warn};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::data_types::genotype_metrics::coerce_numeric;
use crate::data_types::pipeline_error::PipelineError;
use crate::data_types::variant_record::{
    VariantRecord, VCF_FIXED_COLUMNS,
    COLUMN_ALT, COLUMN_CHROM, COLUMN_FILTER, COLUMN_FORMAT, COLUMN_ID, COLUMN_INFO, COLUMN_POS, COLUMN_QUAL, COLUMN_REF
};
use crate::util::file_discovery::sample_stem;
use crate::writers::delimiter_for;

/// A row that could not be turned into a variant record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedRow {
    /// 1-based data row index, header excluded
    pub row_index: usize,
    /// Why it failed
    pub reason: String
}

/// Column indices for a loaded table
#[derive(Clone, Copy, Debug)]
struct ColumnLayout {
    pos: usize,
    qual: usize,
    filter: usize,
    sample: usize,
    format: Option<usize>,
    chrom: Option<usize>,
    id: Option<usize>,
    reference: Option<usize>,
    alternate: Option<usize>,
    info: Option<usize>
}

impl ColumnLayout {
    /// Resolves all columns from the header
    /// # Arguments
    /// * `headers` - the header row
    /// * `sample_hint` - preferred sample column name, usually the file stem
    /// * `source` - path used in error messages
    fn from_headers(headers: &csv::StringRecord, sample_hint: &str, source: &Path) -> Result<Self, PipelineError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| find(name).ok_or_else(|| PipelineError::MissingColumn {
            column: name.to_string(), path: source.to_path_buf()
        });

        // POS is checked first, it is the most important one
        let pos = require(COLUMN_POS)?;
        let qual = require(COLUMN_QUAL)?;
        let filter = require(COLUMN_FILTER)?;

        // the sample column is named after the file if possible, otherwise it is the first non-VCF column
        let sample = match find(sample_hint) {
            Some(index) => index,
            None => {
                debug!("Finding sample column for {sample_hint}...");
                headers.iter()
                    .position(|h| !VCF_FIXED_COLUMNS.contains(&h))
                    .ok_or_else(|| PipelineError::NoSampleColumn { path: source.to_path_buf() })?
            }
        };

        Ok(Self {
            pos, qual, filter, sample,
            format: find(COLUMN_FORMAT),
            chrom: find(COLUMN_CHROM),
            id: find(COLUMN_ID),
            reference: find(COLUMN_REF),
            alternate: find(COLUMN_ALT),
            info: find(COLUMN_INFO)
        })
    }

    /// Converts one CSV record into a variant
    fn parse_record(&self, record: &csv::StringRecord) -> Result<VariantRecord, String> {
        let get = |index: usize| record.get(index).unwrap_or_default();
        let get_opt = |opt_index: Option<usize>| opt_index.map(get).unwrap_or_default().to_string();

        let raw_pos = get(self.pos);
        let position: u64 = raw_pos.trim().parse()
            .map_err(|e| format!("invalid POS value {raw_pos:?}: {e}"))?;

        Ok(VariantRecord {
            chrom: get_opt(self.chrom),
            position,
            id: get_opt(self.id),
            reference: get_opt(self.reference),
            alternate: get_opt(self.alternate),
            quality: coerce_numeric(get(self.qual)),
            filter: get(self.filter).to_string(),
            info: get_opt(self.info),
            format: get_opt(self.format),
            sample_value: get(self.sample).to_string()
        })
    }
}

/// A loaded variant table for one sample
#[derive(Clone, Debug)]
pub struct VariantTable {
    /// Where this came from
    source: PathBuf,
    /// The column holding the sample values
    sample_column: String,
    /// Successfully parsed rows in file order
    records: Vec<VariantRecord>,
    /// Rows that were dropped, in file order
    malformed_rows: Vec<MalformedRow>
}

impl VariantTable {
    /// Loads a converted VCF table; the sample column is matched against the file stem.
    /// # Arguments
    /// * `filename` - the .csv/.tsv table to load
    /// # Errors
    /// * if the file cannot be opened or the header read
    /// * if POS, QUAL, or FILTER are missing
    /// * if no sample column can be identified
    pub fn from_path(filename: &Path) -> anyhow::Result<Self> {
        let stem = sample_stem(filename)
            .with_context(|| format!("Error while deriving sample name from {filename:?}:"))?;
        let file = File::open(filename)
            .with_context(|| format!("Error while opening {filename:?}:"))?;
        Self::from_reader(file, delimiter_for(filename), &stem, filename)
    }

    /// Loads a converted VCF table from any reader.
    /// Rows that fail to parse are logged and collected, they do not stop the load.
    /// # Arguments
    /// * `reader` - the table content, header included
    /// * `delimiter` - field delimiter
    /// * `sample_hint` - preferred sample column name
    /// * `source` - path used in messages
    pub fn from_reader<R: std::io::Read>(reader: R, delimiter: u8, sample_hint: &str, source: &Path) -> anyhow::Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .from_reader(reader);
        let headers = csv_reader.headers()
            .with_context(|| format!("Error while reading header from {source:?}:"))?
            .clone();
        let layout = ColumnLayout::from_headers(&headers, sample_hint, source)?;
        let sample_column = headers[layout.sample].to_string();

        let (records, malformed_rows): (Vec<VariantRecord>, Vec<MalformedRow>) = csv_reader.records()
            .enumerate()
            .partition_map(|(i, result)| {
                let parsed = result
                    .map_err(|e| e.to_string())
                    .and_then(|record| layout.parse_record(&record));
                match parsed {
                    Ok(variant) => Either::Left(variant),
                    Err(reason) => Either::Right(MalformedRow { row_index: i + 1, reason })
                }
            });

        for malformed in malformed_rows.iter() {
            warn!("Dropping row {} from {source:?}: {}", malformed.row_index, malformed.reason);
        }

        Ok(Self {
            source: source.to_path_buf(),
            sample_column,
            records,
            malformed_rows
        })
    }

    // getters
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn sample_column(&self) -> &str {
        &self.sample_column
    }

    pub fn records(&self) -> &[VariantRecord] {
        &self.records
    }

    pub fn malformed_rows(&self) -> &[MalformedRow] {
        &self.malformed_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "CHROM,POS,ID,REF,ALT,QUAL,FILTER,INFO,FORMAT,SRR001";

    fn load(content: &str, hint: &str) -> anyhow::Result<VariantTable> {
        VariantTable::from_reader(Cursor::new(content.to_string()), b',', hint, Path::new("mock.csv"))
    }

    #[test]
    fn test_basic_load() {
        let content = format!("{HEADER}\nchr11,67995000,.,A,G,60.5,PASS,DP=7,GT:DP:GQ,0/1:7:30\nchr11,67995010,.,C,T,.,LowQual,DP=2,GT:DP:GQ,0/1:2:5\n");
        let table = load(&content, "SRR001").unwrap();
        assert_eq!(table.sample_column(), "SRR001");
        assert_eq!(table.records().len(), 2);
        assert!(table.malformed_rows().is_empty());

        let first = &table.records()[0];
        assert_eq!(first.chrom, "chr11");
        assert_eq!(first.position, 67995000);
        assert_eq!(first.quality, Some(60.5));
        assert_eq!(first.format, "GT:DP:GQ");
        assert_eq!(first.sample_value, "0/1:7:30");
        assert_eq!(table.records()[1].quality, None);
        assert_eq!(table.records()[1].filter, "LowQual");
    }

    #[test]
    fn test_sample_fallback() {
        // file stem does not match the column, so the first non-VCF column gets used
        let content = format!("{HEADER},EXTRA\nchr11,1,.,A,G,10,PASS,.,GT,0/1,x\n");
        let table = load(&content, "SRR999").unwrap();
        assert_eq!(table.sample_column(), "SRR001");
    }

    #[test]
    fn test_missing_columns() {
        let error = load("CHROM,QUAL,FILTER,FORMAT,S\nchr11,1,PASS,GT,0/1\n", "S").unwrap_err();
        assert!(matches!(error.downcast_ref::<PipelineError>(), Some(PipelineError::MissingColumn { column, .. }) if column == "POS"));

        let error = load("CHROM,POS,ID,REF,ALT,QUAL,FILTER,INFO,FORMAT\nchr11,1,.,A,G,1,PASS,.,GT\n", "S").unwrap_err();
        assert!(matches!(error.downcast_ref::<PipelineError>(), Some(PipelineError::NoSampleColumn { .. })));
    }

    #[test]
    fn test_malformed_rows() {
        let content = format!("{HEADER}\nchr11,abc,.,A,G,60,PASS,.,GT:GQ,0/1:30\nchr11,5,.,A,G,60,PASS,.,GT:GQ,0/1:30\nchr11,6,.,A\n");
        let table = load(&content, "SRR001").unwrap();
        assert_eq!(table.records().len(), 1);
        assert_eq!(table.records()[0].position, 5);
        assert_eq!(table.malformed_rows().len(), 2);
        assert_eq!(table.malformed_rows()[0].row_index, 1);
        assert!(table.malformed_rows()[0].reason.contains("invalid POS"));
        assert_eq!(table.malformed_rows()[1].row_index, 3);
    }
}
