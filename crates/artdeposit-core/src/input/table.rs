//! CSV export: one row per artifact submission.

use crate::errors::{DepositError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// One CSV data row. Cells are keyed by header; a row shorter than the header
/// simply lacks the trailing columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRow {
    /// 1-based data row number (header excluded).
    pub row: usize,
    cells: BTreeMap<String, String>,
}

impl ArtifactRow {
    pub fn new(row: usize, cells: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            row,
            cells: cells.into_iter().collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Trimmed value of a required column.
    pub fn require(&self, column: &str) -> Result<&str> {
        self.get(column)
            .map(str::trim)
            .ok_or_else(|| DepositError::MissingColumn {
                column: column.to_string(),
                row: self.row,
            })
    }

    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.is_empty())
    }
}

/// Read the CSV export from disk.
pub fn read_artifacts(path: &Path) -> Result<Vec<ArtifactRow>> {
    let content = fs::read_to_string(path).map_err(|e| DepositError::io(path, e))?;
    parse_artifacts(&content).map_err(|e| match e {
        DepositError::Csv { source, .. } => DepositError::Csv {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

/// Parse CSV text. A leading BOM is dropped and trailing blank rows are discarded.
pub fn parse_artifacts(content: &str) -> Result<Vec<ArtifactRow>> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let csv_err = |source| DepositError::Csv {
        path: "<input>".to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let cells = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()));
        rows.push(ArtifactRow::new(i + 1, cells));
    }

    while rows.last().is_some_and(ArtifactRow::is_blank) {
        rows.pop();
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_and_trailing_blank_rows() {
        let csv = "\u{feff}ppopp23-p#,Title,Available URL\n\
                   1,First,https://doi.org/10.5281/zenodo.1\n\
                   ,,\n\
                   2,Second,Unavailable\n\
                   ,,\n\
                   ,,\n";
        let rows = parse_artifacts(csv).unwrap();
        assert_eq!(rows.len(), 3, "only trailing blank rows are dropped");
        assert_eq!(rows[0].require("ppopp23-p#").unwrap(), "1");
        assert!(rows[1].is_blank());
        assert_eq!(rows[2].row, 3);
        assert_eq!(rows[2].require("Available URL").unwrap(), "Unavailable");
    }

    #[test]
    fn require_trims_and_reports_missing_column() {
        let rows = parse_artifacts("Title,DOI\n  Fast Caches  ,10.1145/1\n").unwrap();
        assert_eq!(rows[0].require("Title").unwrap(), "Fast Caches");
        match rows[0].require("Available URL") {
            Err(DepositError::MissingColumn { column, row }) => {
                assert_eq!(column, "Available URL");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn short_rows_lack_trailing_columns() {
        let rows = parse_artifacts("a,b,c\n1,2\n").unwrap();
        assert_eq!(rows[0].get("b"), Some("2"));
        assert_eq!(rows[0].get("c"), None);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let rows = parse_artifacts("Title,DOI\n\"Caches, Fast\",10.1145/1\n").unwrap();
        assert_eq!(rows[0].require("Title").unwrap(), "Caches, Fast");
    }
}
