//! Batch driver: load both exports, join, synthesize and package.
//!
//! Single pass over the CSV rows in file order. The first fatal error aborts
//! the run; nothing is retried or resumed.

use crate::archive::{archive_file_name, write_archive_file, DepositPackage};
use crate::config::DepositConfig;
use crate::errors::{DepositError, Result};
use crate::input::{read_artifacts, read_records};
use crate::manifest::build_manifest;
use crate::matcher::{MatchOutcome, MatchedArtifact, Matcher};
use crate::metadata::{build_metadata, MetadataInput};
use crate::xml::render;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Validate and synthesize everything but write no files.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    pub tracking_number: String,
    pub path: PathBuf,
    /// Absent in dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub archives: Vec<ArchiveSummary>,
    pub skipped: Vec<String>,
    pub title_mismatches: usize,
    pub dry_run: bool,
}

/// Build both documents for one matched artifact. Pure.
pub fn build_package(config: &DepositConfig, matched: &MatchedArtifact) -> DepositPackage {
    let manifest = build_manifest(config, &matched.artifact_doi);
    let metadata = build_metadata(
        config,
        MetadataInput {
            record: &matched.record,
            artifact_doi: &matched.artifact_doi,
            paper_doi: &matched.paper_doi,
            badges: &matched.badges,
        },
    );
    DepositPackage {
        suffix: matched.artifact_doi.suffix().to_string(),
        manifest: render(&manifest),
        metadata: render(&metadata),
    }
}

pub fn run(config: &DepositConfig, options: RunOptions) -> Result<RunSummary> {
    let rows = read_artifacts(&config.artifacts_path)?;
    let records = read_records(&config.records_path)?;
    info!(
        "loaded {} rows from {} and {} papers from {}",
        rows.len(),
        config.artifacts_path.display(),
        records.len(),
        config.records_path.display()
    );

    let report = Matcher::new(config, &records).match_all(&rows)?;

    if !options.dry_run {
        fs::create_dir_all(&config.output_dir)
            .map_err(|e| DepositError::io(&config.output_dir, e))?;
    }

    let mut summary = RunSummary {
        rows: rows.len(),
        title_mismatches: report.title_mismatches.len(),
        dry_run: options.dry_run,
        ..Default::default()
    };

    for outcome in &report.outcomes {
        match outcome {
            MatchOutcome::Skipped { tracking_number } => {
                summary.skipped.push(tracking_number.clone());
            }
            MatchOutcome::Ready(matched) => {
                let package = build_package(config, matched);
                let archive = if options.dry_run {
                    let path = config
                        .output_dir
                        .join(archive_file_name(&package.suffix, config.issue_date));
                    debug!("dry run: would write {}", path.display());
                    ArchiveSummary {
                        tracking_number: matched.tracking_number.clone(),
                        path,
                        sha256: None,
                    }
                } else {
                    let written =
                        write_archive_file(&config.output_dir, &package, config.issue_date)?;
                    info!(
                        "#{}: wrote {} ({} bytes, sha256 {})",
                        matched.tracking_number,
                        written.path.display(),
                        written.size,
                        written.sha256
                    );
                    ArchiveSummary {
                        tracking_number: matched.tracking_number.clone(),
                        path: written.path,
                        sha256: Some(written.sha256),
                    }
                };
                summary.archives.push(archive);
            }
        }
    }

    Ok(summary)
}
