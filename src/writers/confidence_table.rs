
use std::path::Path;

use crate::data_types::confidence_record::ConfidenceRecord;
use crate::writers::atomic_file::write_atomically;
use crate::writers::delimiter_for;

/// Writes the scored variants with the 9 confidence columns; missing values become empty cells
/// # Arguments
/// * `records` - the scored variants in input order
/// * `filename` - the output path (csv/tsv)
pub fn write_confidence_table(records: &[ConfidenceRecord], filename: &Path) -> anyhow::Result<()> {
    let delimiter = delimiter_for(filename);
    write_atomically(filename, |writer| {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        for record in records.iter() {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::confidence_record::CONFIDENCE_COLUMNS;

    #[test]
    fn test_write_confidence_table() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("S1_confidence.csv");
        let records = vec![
            ConfidenceRecord {
                position: 68000000,
                gq: Some(30.0), qual: Some(60.0), dp: Some(20.0),
                gq_conf: Some(0.999), qual_conf: Some(0.99999), dp_conf: Some(0.5),
                confidence: Some(0.899596),
                filter: "PASS".to_string()
            },
            ConfidenceRecord {
                position: 68000010,
                gq: None, qual: Some(12.5), dp: Some(3.0),
                gq_conf: None, qual_conf: Some(0.5), dp_conf: Some(0.25),
                confidence: None,
                filter: "LowQual".to_string()
            },
        ];
        write_confidence_table(&records, &filename).unwrap();

        let content = std::fs::read_to_string(&filename).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], CONFIDENCE_COLUMNS.join(","));
        assert_eq!(lines[1], "68000000,30.0,60.0,20.0,0.999,0.99999,0.5,0.899596,PASS");
        assert_eq!(lines[2], "68000010,,12.5,3.0,,0.5,0.25,,LowQual");
        assert_eq!(lines.len(), 3);
    }
}
