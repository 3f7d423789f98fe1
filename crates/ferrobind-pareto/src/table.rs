//! Candidate table loaded from a delimited file.
//!
//! Header names are trimmed of surrounding whitespace. Data cells are kept as
//! the raw strings read from disk, so a filtered table is written back with
//! its cell text intact. Only the columns a computation asks for are parsed,
//! via [`CandidateTable::objective_matrix`].

use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ParetoError, Result};
use crate::matrix::ObjectiveMatrix;

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTable {
    headers: Vec<String>,
    id_column: String,
    id_index: usize,
    rows: Vec<Vec<String>>,
}

impl CandidateTable {
    /// Build a table from a header and rows of raw cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, id_column: &str) -> Result<Self> {
        let id_index = headers
            .iter()
            .position(|h| h == id_column)
            .ok_or_else(|| ParetoError::MissingIdColumn(id_column.to_string()))?;

        for row in &rows {
            if row.len() != headers.len() {
                return Err(ParetoError::DimensionMismatch {
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
        }

        Ok(Self {
            headers,
            id_column: id_column.to_string(),
            id_index,
            rows,
        })
    }

    /// Read a table with a header row.
    pub fn from_reader<R: Read>(reader: R, id_column: &str, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        debug!("Read {} rows with {} columns", rows.len(), headers.len());
        Self::new(headers, rows, id_column)
    }

    pub fn from_csv_str(content: &str, id_column: &str) -> Result<Self> {
        Self::from_reader(content.as_bytes(), id_column, b',')
    }

    pub fn from_path(path: impl AsRef<Path>, id_column: &str, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file, id_column, delimiter)?;
        info!("Loaded {} candidates from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Identifier of row `r`.
    pub fn id(&self, r: usize) -> &str {
        &self.rows[r][self.id_index]
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |row| row[self.id_index].as_str())
    }

    /// Raw cell at row `r` of the named column.
    pub fn value(&self, r: usize, column: &str) -> Option<&str> {
        let c = self.column_index(column)?;
        self.rows.get(r).map(|row| row[c].as_str())
    }

    /// Parse the named columns, in the given order, into an objective matrix.
    ///
    /// Fails if the list is empty, names a column twice or names an unknown
    /// column, or if any selected cell is empty, non-numeric or non-finite.
    pub fn objective_matrix(&self, columns: &[String]) -> Result<ObjectiveMatrix> {
        if columns.is_empty() {
            return Err(ParetoError::EmptyObjectives);
        }

        let mut seen = HashSet::new();
        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            if !seen.insert(name.as_str()) {
                return Err(ParetoError::DuplicateColumn(name.clone()));
            }
            let idx = self
                .column_index(name)
                .ok_or_else(|| ParetoError::UnknownColumn(name.clone()))?;
            indices.push(idx);
        }

        let mut values = Vec::with_capacity(self.rows.len() * columns.len());
        for row in &self.rows {
            for (&c, name) in indices.iter().zip(columns) {
                values.push(self.parse_cell(row, c, name)?);
            }
        }

        Ok(ObjectiveMatrix::from_parts(columns.to_vec(), values, self.rows.len()))
    }

    fn parse_cell(&self, row: &[String], c: usize, column: &str) -> Result<f64> {
        let raw = row[c].trim();
        let value: f64 = raw.parse().map_err(|_| ParetoError::NonNumeric {
            row: row[self.id_index].clone(),
            column: column.to_string(),
            value: raw.to_string(),
        })?;
        if !value.is_finite() {
            return Err(ParetoError::NonFinite {
                row: row[self.id_index].clone(),
                column: column.to_string(),
            });
        }
        Ok(value)
    }

    /// Iteration number of every row. A missing column means iteration 0 throughout.
    pub fn iterations(&self, column: &str) -> Result<Vec<i64>> {
        let Some(c) = self.column_index(column) else {
            debug!("No '{}' column, treating every row as iteration 0", column);
            return Ok(vec![0; self.rows.len()]);
        };

        self.rows
            .iter()
            .map(|row| {
                let raw = row[c].trim();
                // Iterations exported through pandas may carry a trailing ".0"
                raw.parse::<i64>()
                    .ok()
                    .or_else(|| {
                        raw.parse::<f64>()
                            .ok()
                            .filter(|v| v.is_finite() && v.fract() == 0.0)
                            .map(|v| v as i64)
                    })
                    .ok_or_else(|| ParetoError::InvalidIteration {
                        row: row[self.id_index].clone(),
                        value: raw.to_string(),
                    })
            })
            .collect()
    }

    /// New table holding `indices` in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> CandidateTable {
        CandidateTable {
            headers: self.headers.clone(),
            id_column: self.id_column.clone(),
            id_index: self.id_index,
            rows: indices.iter().map(|&r| self.rows[r].clone()).collect(),
        }
    }

    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut writer = csv::WriterBuilder::new().delimiter(delimiter).from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_path(&self, path: impl AsRef<Path>, delimiter: u8) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.write_csv(file, delimiter)?;
        info!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "name,pae_a,pae_b,uncertainty_pae_a,iteration\n\
                       A,1.0,5.0,0.1,0\n\
                       B,2.0,4.0,0.2,1\n\
                       C,3.0,3.0,0.3,1.0\n";

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_and_matrix() {
        let table = CandidateTable::from_csv_str(CSV, "name").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);

        let m = table.objective_matrix(&cols(&["pae_b", "pae_a"])).unwrap();
        assert_eq!(m.columns(), &["pae_b".to_string(), "pae_a".to_string()]);
        assert_eq!(m.row(0), &[5.0, 1.0]);
        assert_eq!(m.row(2), &[3.0, 3.0]);
    }

    #[test]
    fn test_missing_id_column() {
        let err = CandidateTable::from_csv_str(CSV, "sequence").unwrap_err();
        assert!(matches!(err, ParetoError::MissingIdColumn(c) if c == "sequence"));
    }

    #[test]
    fn test_matrix_validation() {
        let table = CandidateTable::from_csv_str(CSV, "name").unwrap();
        assert!(matches!(table.objective_matrix(&[]), Err(ParetoError::EmptyObjectives)));
        assert!(matches!(
            table.objective_matrix(&cols(&["pae_c"])),
            Err(ParetoError::UnknownColumn(c)) if c == "pae_c"
        ));
        assert!(matches!(
            table.objective_matrix(&cols(&["pae_a", "pae_a"])),
            Err(ParetoError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_non_numeric_and_missing_cells() {
        let table = CandidateTable::from_csv_str("name,score\nA,1.5\nB,\n", "name").unwrap();
        let err = table.objective_matrix(&cols(&["score"])).unwrap_err();
        assert!(matches!(err, ParetoError::NonNumeric { ref row, .. } if row == "B"));

        let table = CandidateTable::from_csv_str("name,score\nA,abc\n", "name").unwrap();
        assert!(table.objective_matrix(&cols(&["score"])).unwrap_err().is_invalid_input());

        let table = CandidateTable::from_csv_str("name,score\nA,NaN\n", "name").unwrap();
        assert!(matches!(
            table.objective_matrix(&cols(&["score"])),
            Err(ParetoError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_ragged_csv_is_csv_error() {
        let err = CandidateTable::from_csv_str("name,score\nA,1,2\n", "name").unwrap_err();
        assert!(matches!(err, ParetoError::Csv(_)));
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_iterations() {
        let table = CandidateTable::from_csv_str(CSV, "name").unwrap();
        assert_eq!(table.iterations("iteration").unwrap(), vec![0, 1, 1]);
        assert_eq!(table.iterations("round").unwrap(), vec![0, 0, 0]);

        let bad = CandidateTable::from_csv_str("name,iteration\nA,1.5\n", "name").unwrap();
        assert!(matches!(bad.iterations("iteration"), Err(ParetoError::InvalidIteration { .. })));
    }

    #[test]
    fn test_select_and_write() {
        let table = CandidateTable::from_csv_str(CSV, "name").unwrap();
        let subset = table.select_rows(&[2, 0]);
        assert_eq!(subset.ids().collect::<Vec<_>>(), vec!["C", "A"]);
        assert_eq!(subset.value(0, "pae_a"), Some("3.0"));

        let mut out = Vec::new();
        subset.write_csv(&mut out, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("name,pae_a,pae_b,uncertainty_pae_a,iteration\n"));
        assert!(text.contains("C,3.0,3.0,0.3,1.0\n"));

        let reread = CandidateTable::from_csv_str(&text, "name").unwrap();
        assert_eq!(reread, subset);
    }

    #[test]
    fn test_headers_trimmed_cells_kept() {
        let table = CandidateTable::from_csv_str("name , pae_a\nA, 1.50 \n", "name").unwrap();
        assert_eq!(table.headers(), &["name".to_string(), "pae_a".to_string()]);
        assert_eq!(table.value(0, "pae_a"), Some(" 1.50 "));

        let mut out = Vec::new();
        table.write_csv(&mut out, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("name,pae_a\n"));
        let reread = CandidateTable::from_csv_str(&text, "name").unwrap();
        assert_eq!(reread.value(0, "pae_a"), Some(" 1.50 "));
    }
}
