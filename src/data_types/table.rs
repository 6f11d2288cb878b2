
use anyhow::Context;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;

use crate::writers::delimiter_for;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("row has {found} fields, but the table has {expected} columns")]
    RowLength { expected: usize, found: usize },
    #[error("join key \"{column}\" is missing from the {side} table")]
    MissingJoinKey { column: String, side: &'static str },
    #[error("column \"{column}\" exists in both tables of the join")]
    ColumnCollision { column: String }
}

/// Tracks a join that changed the number of rows relative to the left table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CardinalityMismatch {
    /// Rows in the left table going into the join
    pub expected: usize,
    /// Rows coming out of the join
    pub observed: usize
}

/// A simple in-memory table of string cells with an ordered header.
/// Missing values are represented by empty cells, same as they appear in the CSV files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names in order
    headers: Vec<String>,
    /// Each row has exactly `headers.len()` cells
    rows: Vec<Vec<String>>
}

impl Table {
    /// Creates an empty table with the given columns
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: vec![]
        }
    }

    /// Loads a delimited file with a header row; the delimiter is chosen from the file extension
    /// # Arguments
    /// * `filename` - path to the .csv/.tsv file to load
    /// # Errors
    /// * if the file cannot be opened or parsed
    pub fn from_path(filename: &Path) -> anyhow::Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter_for(filename))
            .from_path(filename)
            .with_context(|| format!("Error while opening {filename:?}:"))?;

        let headers: Vec<String> = csv_reader.headers()
            .with_context(|| format!("Error while reading header from {filename:?}:"))?
            .iter().map(String::from).collect();

        let mut table = Self::new(headers);
        for result in csv_reader.records() {
            let record = result.with_context(|| format!("Error while reading {filename:?}:"))?;
            table.push_row(record.iter().map(String::from).collect())?;
        }
        Ok(table)
    }

    /// Appends a row to the table
    /// # Errors
    /// * if the row length does not match the number of columns
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TableError> {
        if row.len() != self.headers.len() {
            return Err(TableError::RowLength { expected: self.headers.len(), found: row.len() });
        }
        self.rows.push(row);
        Ok(())
    }

    // getters
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of the first column with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns all values in a column, if the column exists
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[index].as_str()).collect())
    }

    /// Removes every column matching the predicate, returning the removed names in their original order
    pub fn drop_columns<F: Fn(&str) -> bool>(&mut self, predicate: F) -> Vec<String> {
        let keep: Vec<bool> = self.headers.iter().map(|h| !predicate(h)).collect();
        let dropped: Vec<String> = self.headers.iter().zip(keep.iter())
            .filter(|(_h, k)| !**k)
            .map(|(h, _k)| h.clone())
            .collect();
        if dropped.is_empty() {
            return dropped;
        }

        let filter_row = |row: &Vec<String>| -> Vec<String> {
            row.iter().zip(keep.iter())
                .filter(|(_v, k)| **k)
                .map(|(v, _k)| v.clone())
                .collect()
        };
        self.headers = filter_row(&self.headers);
        self.rows = self.rows.iter().map(filter_row).collect();
        dropped
    }

    /// Performs a left-outer join on a shared key column.
    /// Every left row is kept; if there is no match, the right columns are left empty.
    /// If multiple right rows match, the left row is repeated once per match in right-table order.
    /// # Arguments
    /// * `right` - the table to join in, all non-key columns get appended
    /// * `key` - the column name present in both tables
    /// # Errors
    /// * if the key is missing from either table
    /// * if a non-key column name appears in both tables
    pub fn left_join(&self, right: &Table, key: &str) -> Result<Table, TableError> {
        let left_key = self.column_index(key)
            .ok_or(TableError::MissingJoinKey { column: key.to_string(), side: "left" })?;
        let right_key = right.column_index(key)
            .ok_or(TableError::MissingJoinKey { column: key.to_string(), side: "right" })?;

        // figure out which right columns get appended
        let right_columns: Vec<usize> = (0..right.headers.len())
            .filter(|&i| i != right_key)
            .collect();
        for &i in right_columns.iter() {
            if self.has_column(&right.headers[i]) {
                return Err(TableError::ColumnCollision { column: right.headers[i].clone() });
            }
        }

        // index the right table by key, preserving the order of matches
        let mut lookup: IndexMap<&str, Vec<&Vec<String>>> = IndexMap::new();
        for row in right.rows.iter() {
            lookup.entry(row[right_key].as_str()).or_default().push(row);
        }

        let mut headers = self.headers.clone();
        headers.extend(right_columns.iter().map(|&i| right.headers[i].clone()));
        let mut joined = Table::new(headers);

        for left_row in self.rows.iter() {
            match lookup.get(left_row[left_key].as_str()) {
                Some(matches) => {
                    for right_row in matches.iter() {
                        let mut row = left_row.clone();
                        row.extend(right_columns.iter().map(|&i| right_row[i].clone()));
                        joined.rows.push(row);
                    }
                },
                None => {
                    let mut row = left_row.clone();
                    row.extend(right_columns.iter().map(|_i| String::new()));
                    joined.rows.push(row);
                }
            };
        }

        Ok(joined)
    }

    /// Returns a mismatch if this table does not have the expected number of rows
    pub fn check_cardinality(&self, expected: usize) -> Option<CardinalityMismatch> {
        if self.len() == expected {
            None
        } else {
            Some(CardinalityMismatch { expected, observed: self.len() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new(headers.iter().map(|s| s.to_string()).collect());
        for row in rows.iter() {
            table.push_row(row.iter().map(|s| s.to_string()).collect()).unwrap();
        }
        table
    }

    #[test]
    fn test_push_row_length() {
        let mut table = build_table(&["Run", "x"], &[]);
        assert_eq!(
            table.push_row(vec!["a".to_string()]),
            Err(TableError::RowLength { expected: 2, found: 1 })
        );
        assert!(table.is_empty());
    }

    #[test]
    fn test_left_join_keeps_unmatched() {
        let left = build_table(&["Run", "unc_mut"], &[&["S1", "3"], &["S2", "1"], &["S3", "0"]]);
        let right = build_table(&["Run", "Average_Depth_UNC"], &[&["S3", "2.5"], &["S1", "5.8"]]);
        let joined = left.left_join(&right, "Run").unwrap();

        assert_eq!(joined.headers(), &["Run", "unc_mut", "Average_Depth_UNC"]);
        assert_eq!(joined.rows(), &[
            vec!["S1".to_string(), "3".to_string(), "5.8".to_string()],
            vec!["S2".to_string(), "1".to_string(), "".to_string()],
            vec!["S3".to_string(), "0".to_string(), "2.5".to_string()],
        ]);
        assert_eq!(joined.check_cardinality(left.len()), None);
    }

    #[test]
    fn test_left_join_duplicates() {
        let left = build_table(&["Run", "Tissue"], &[&["S1", "liver"], &["S2", "lung"]]);
        let right = build_table(&["Run", "Coverage_>2"], &[&["S1", "4"], &["S1", "7"]]);
        let joined = left.left_join(&right, "Run").unwrap();

        assert_eq!(joined.len(), 3);
        assert_eq!(joined.column_values("Coverage_>2").unwrap(), vec!["4", "7", ""]);
        assert_eq!(joined.check_cardinality(left.len()), Some(CardinalityMismatch { expected: 2, observed: 3 }));
    }

    #[test]
    fn test_left_join_errors() {
        let left = build_table(&["Run", "x"], &[&["S1", "1"]]);
        let right = build_table(&["Sample", "y"], &[&["S1", "2"]]);
        assert_eq!(
            left.left_join(&right, "Run"),
            Err(TableError::MissingJoinKey { column: "Run".to_string(), side: "right" })
        );

        let right = build_table(&["Run", "x"], &[&["S1", "2"]]);
        assert_eq!(
            left.left_join(&right, "Run"),
            Err(TableError::ColumnCollision { column: "x".to_string() })
        );
    }

    #[test]
    fn test_drop_columns() {
        let mut table = build_table(
            &["Run", "Coverage_>2", "Tissue", "Average_Depth_UNC"],
            &[&["S1", "4", "liver", "5.8"]]
        );
        let dropped = table.drop_columns(|c| c.starts_with("Coverage_>") || c == "Average_Depth_UNC");
        assert_eq!(dropped, vec!["Coverage_>2".to_string(), "Average_Depth_UNC".to_string()]);
        assert_eq!(table.headers(), &["Run", "Tissue"]);
        assert_eq!(table.rows(), &[vec!["S1".to_string(), "liver".to_string()]]);

        // nothing left to drop
        assert!(table.drop_columns(|c| c.starts_with("Coverage_>")).is_empty());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let filename = dir.path().join("meta.csv");
        std::fs::write(&filename, "Run,Tissue,Notes\nS1,liver,\"a, b\"\nS2,lung,\n").unwrap();

        let table = Table::from_path(&filename).unwrap();
        assert_eq!(table.headers(), &["Run", "Tissue", "Notes"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_values("Notes").unwrap(), vec!["a, b", ""]);
        assert_eq!(table.column_values("Missing"), None);
    }
}
