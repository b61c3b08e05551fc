//! Deposit archive writer.
//!
//! Writes a reproducible .zip with canonical layout: `manifest.xml`, then
//! `{suffix}/`, `{suffix}/meta/` and `{suffix}/meta/{suffix}.xml`. Every entry
//! carries the issue date (midnight) as its timestamp and fixed POSIX modes,
//! so identical inputs produce identical bytes.

use crate::errors::{DepositError, Result};
use chrono::{Datelike, NaiveDate};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use zip::result::{ZipError, ZipResult};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

/// Canonical paths inside the archive (POSIX, relative to root).
pub mod paths {
    /// Transfer manifest at archive root.
    pub const MANIFEST: &str = "manifest.xml";

    pub fn deposit_dir(suffix: &str) -> String {
        format!("{suffix}/")
    }

    pub fn meta_dir(suffix: &str) -> String {
        format!("{suffix}/meta/")
    }

    pub fn metadata(suffix: &str) -> String {
        format!("{suffix}/meta/{suffix}.xml")
    }
}

pub const FILE_MODE: u32 = 0o644;
pub const DIR_MODE: u32 = 0o755;
const DEFLATE_LEVEL: i64 = 9;

/// Rendered documents for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositPackage {
    /// Suffix of the artifact DOI; names the deposit directory.
    pub suffix: String,
    pub manifest: Vec<u8>,
    pub metadata: Vec<u8>,
}

/// One entry in archive order. Directories have no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry<'a> {
    pub path: String,
    pub data: Option<&'a [u8]>,
}

impl DepositPackage {
    /// Entries in the order they are written.
    pub fn entries(&self) -> Vec<ArchiveEntry<'_>> {
        vec![
            ArchiveEntry {
                path: paths::MANIFEST.to_string(),
                data: Some(&self.manifest),
            },
            ArchiveEntry {
                path: paths::deposit_dir(&self.suffix),
                data: None,
            },
            ArchiveEntry {
                path: paths::meta_dir(&self.suffix),
                data: None,
            },
            ArchiveEntry {
                path: paths::metadata(&self.suffix),
                data: Some(&self.metadata),
            },
        ]
    }
}

/// `artifacts_{suffix}_{YYYYMMDD}.zip`
pub fn archive_file_name(suffix: &str, issue_date: NaiveDate) -> String {
    format!("artifacts_{}_{}.zip", suffix, issue_date.format("%Y%m%d"))
}

fn zip_timestamp(issue_date: NaiveDate) -> Result<DateTime> {
    let year = u16::try_from(issue_date.year()).ok();
    year.and_then(|y| {
        DateTime::from_date_and_time(y, issue_date.month() as u8, issue_date.day() as u8, 0, 0, 0)
            .ok()
    })
    .ok_or_else(|| {
        DepositError::Config(format!(
            "issueDate {issue_date} cannot be stored in a zip timestamp (1980-2107)"
        ))
    })
}

/// Write the archive to `w`. Returns the writer after the central directory is flushed.
pub fn write_archive<W: Write + Seek>(
    w: W,
    package: &DepositPackage,
    issue_date: NaiveDate,
) -> Result<W> {
    let mtime = zip_timestamp(issue_date)?;
    write_entries(w, package, mtime).map_err(|source| DepositError::Archive {
        path: PathBuf::from(archive_file_name(&package.suffix, issue_date)),
        source,
    })
}

fn write_entries<W: Write + Seek>(
    w: W,
    package: &DepositPackage,
    mtime: DateTime,
) -> ZipResult<W> {
    let file_opts = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(DEFLATE_LEVEL))
        .last_modified_time(mtime)
        .unix_permissions(FILE_MODE);
    let dir_opts = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(mtime)
        .unix_permissions(DIR_MODE);

    let mut zip = ZipWriter::new(w);
    for entry in package.entries() {
        match entry.data {
            Some(data) => {
                zip.start_file(entry.path.as_str(), file_opts)?;
                zip.write_all(data).map_err(ZipError::Io)?;
            }
            None => zip.add_directory(entry.path.as_str(), dir_opts)?,
        }
    }
    zip.finish()
}

/// Render the archive in memory. Returns bytes and their sha256 (hex).
pub fn archive_bytes(package: &DepositPackage, issue_date: NaiveDate) -> Result<(Vec<u8>, String)> {
    let cursor = write_archive(Cursor::new(Vec::new()), package, issue_date)?;
    let bytes = cursor.into_inner();
    let digest = hex::encode(Sha256::digest(&bytes));
    Ok((bytes, digest))
}

/// A written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArchive {
    pub path: PathBuf,
    pub sha256: String,
    pub size: u64,
}

/// Write `artifacts_{suffix}_{date}.zip` into `output_dir`, replacing any existing file.
pub fn write_archive_file(
    output_dir: &Path,
    package: &DepositPackage,
    issue_date: NaiveDate,
) -> Result<WrittenArchive> {
    let path = output_dir.join(archive_file_name(&package.suffix, issue_date));
    let (bytes, sha256) = archive_bytes(package, issue_date)?;

    match fs::remove_file(&path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(DepositError::io(&path, e)),
    }
    fs::write(&path, &bytes).map_err(|e| DepositError::io(&path, e))?;

    Ok(WrittenArchive {
        path,
        sha256,
        size: bytes.len() as u64,
    })
}
