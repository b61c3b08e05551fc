//! Loaders for the two exports joined by the pipeline.

pub mod records;
pub mod table;

pub use records::{parse_records, read_records, AuthorEntry, PaperEntry, PaperRecord, RecordIndex};
pub use table::{parse_artifacts, read_artifacts, ArtifactRow};
