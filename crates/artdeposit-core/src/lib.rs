pub mod archive;
pub mod badges;
pub mod config;
pub mod doi;
pub mod errors;
pub mod input;
pub mod manifest;
pub mod matcher;
pub mod metadata;
pub mod pipeline;
pub mod xml;

// Convenience re-exports
pub use archive::{
    archive_bytes, archive_file_name, write_archive, write_archive_file, DepositPackage,
    WrittenArchive,
};
pub use badges::BadgeSet;
pub use config::{BadgeDef, DepositConfig};
pub use doi::Doi;
pub use errors::{DepositError, Result};
pub use input::{ArtifactRow, AuthorEntry, PaperRecord, RecordIndex};
pub use matcher::{MatchOutcome, MatchReport, MatchedArtifact, Matcher, TitleMismatch};
pub use pipeline::{build_package, run, ArchiveSummary, RunOptions, RunSummary};
