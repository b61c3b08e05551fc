//! Error types for the deposit pipeline.
//!
//! Every variant names the column, element path or value that caused it so the
//! offending spot can be located in the source export.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for deposit operations.
pub type Result<T> = std::result::Result<T, DepositError>;

/// Fatal conditions. Any of these aborts the whole run.
#[derive(Debug, Error)]
pub enum DepositError {
    /// Identifier did not match the accepted DOI forms.
    #[error("{value:?} is not a valid DOI URL")]
    MalformedIdentifier { value: String },

    /// A required CSV column is absent.
    #[error("column {column:?} is missing in CSV (row {row})")]
    MissingColumn { column: String, row: usize },

    /// A required element is absent from a matched record.
    #[error("element {path} is missing in XML ({context})")]
    MissingElement { path: String, context: String },

    /// Tracking number present in the table but not in the records.
    #[error("tracking number #{tracking_number} is missing in XML")]
    MissingRecord { tracking_number: String },

    #[error("tracking number #{tracking_number} appears more than once in CSV (rows {first_row} and {row})")]
    DuplicateTrackingNumber {
        tracking_number: String,
        first_row: usize,
        row: usize,
    },

    #[error("element /erights_record/paper/event_tracking_number {key:?} appears more than once in XML")]
    DuplicateRecord { key: String },

    #[error("author sequence_no {sequence} is duplicated in paper {key}")]
    DuplicateSequence { key: String, sequence: u32 },

    #[error("author sequence_no {sequence} must be positive in paper {key}")]
    NonPositiveSequence { key: String, sequence: i64 },

    #[error("author sequence_no {value:?} is not an integer in paper {key}")]
    InvalidSequence { key: String, value: String },

    /// Invalid or incomplete configuration.
    #[error("config error: {0}")]
    Config(String),

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("XML error in {path}: {source}")]
    Xml {
        path: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("archive error for {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DepositError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn missing_element(path: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingElement {
            path: path.into(),
            context: context.into(),
        }
    }

    /// True for problems in the CSV/XML inputs, as opposed to setup failures.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            Self::Config(_) | Self::Io { .. } | Self::Archive { .. }
        )
    }

    /// Suggested exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        if self.is_input_error() {
            3
        } else {
            2
        }
    }
}
