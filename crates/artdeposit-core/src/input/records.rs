//! XML table-of-contents export: one `paper` entry per accepted paper.
//!
//! Papers are indexed eagerly but validated lazily: a paper's fields are only
//! checked when a CSV row is joined to it, so unrelated papers with gaps in
//! their metadata do not abort the run.

use crate::errors::{DepositError, Result};
use roxmltree::Node;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

pub const ROOT_ELEMENT: &str = "erights_record";
const PAPER_PATH: &str = "/erights_record/paper";
const AUTHOR_PATH: &str = "/erights_record/paper/authors/author";

/// A validated paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRecord {
    /// Lookup key, i.e. proceeding prefix + tracking number.
    pub key: String,
    pub title: String,
    /// Sorted by ascending sequence number.
    pub authors: Vec<AuthorEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorEntry {
    pub sequence: u32,
    pub prefix: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub suffix: String,
    pub email: String,
    pub orcid: String,
    /// First listed institution only.
    pub affiliation: String,
}

fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

impl AuthorEntry {
    /// Stable per-author anchor, `sequence - 1`.
    pub fn anchor(&self) -> u32 {
        self.sequence - 1
    }

    /// First and middle name. Some submissions put both in `first_name`.
    pub fn given_name(&self) -> String {
        join_nonempty(&[&self.first_name, &self.middle_name])
    }

    pub fn display_name(&self) -> String {
        join_nonempty(&[
            &self.prefix,
            &self.first_name,
            &self.middle_name,
            &self.last_name,
            &self.suffix,
        ])
    }
}

/// Unvalidated author fields as found in the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RawAuthor {
    sequence_no: Option<String>,
    prefix: Option<String>,
    first_name: Option<String>,
    middle_name: Option<String>,
    last_name: Option<String>,
    suffix: Option<String>,
    email_address: Option<String>,
    orcid: Option<String>,
    institution: Option<String>,
}

/// Unvalidated paper entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperEntry {
    key: String,
    title: Option<String>,
    authors: Vec<RawAuthor>,
}

/// Fetch a required field or fail with its full element path.
fn required<'a>(value: &'a Option<String>, path: &str, key: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| DepositError::missing_element(path, format!("paper {key}")))
}

impl PaperEntry {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Title, required. Used by the matcher before the full record is needed.
    pub fn title(&self) -> Result<&str> {
        required(
            &self.title,
            &format!("{PAPER_PATH}/paper_title"),
            &self.key,
        )
    }

    /// Validate every field and return the typed record.
    pub fn to_record(&self) -> Result<PaperRecord> {
        let title = self.title()?.to_string();
        let mut seen = BTreeSet::new();
        let mut authors = Vec::with_capacity(self.authors.len());

        for raw in &self.authors {
            let field = |value: &Option<String>, name: &str| -> Result<String> {
                required(value, &format!("{AUTHOR_PATH}/{name}"), &self.key).map(str::to_string)
            };

            let sequence = parse_sequence(&field(&raw.sequence_no, "sequence_no")?, &self.key)?;
            if !seen.insert(sequence) {
                return Err(DepositError::DuplicateSequence {
                    key: self.key.clone(),
                    sequence,
                });
            }

            authors.push(AuthorEntry {
                sequence,
                prefix: field(&raw.prefix, "prefix")?,
                first_name: field(&raw.first_name, "first_name")?,
                middle_name: field(&raw.middle_name, "middle_name")?,
                last_name: field(&raw.last_name, "last_name")?,
                suffix: field(&raw.suffix, "suffix")?,
                email: field(&raw.email_address, "email_address")?,
                orcid: field(&raw.orcid, "ORCID")?,
                affiliation: field(
                    &raw.institution,
                    "affiliations/affiliation/institution",
                )?,
            });
        }

        authors.sort_by_key(|a| a.sequence);
        Ok(PaperRecord {
            key: self.key.clone(),
            title,
            authors,
        })
    }
}

fn parse_sequence(value: &str, key: &str) -> Result<u32> {
    let n: i64 = value.parse().map_err(|_| DepositError::InvalidSequence {
        key: key.to_string(),
        value: value.to_string(),
    })?;
    if n <= 0 {
        return Err(DepositError::NonPositiveSequence {
            key: key.to_string(),
            sequence: n,
        });
    }
    u32::try_from(n).map_err(|_| DepositError::InvalidSequence {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Papers keyed by tracking number. Lookups do not depend on document order.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    papers: BTreeMap<String, PaperEntry>,
}

impl RecordIndex {
    pub fn get(&self, key: &str) -> Option<&PaperEntry> {
        self.papers.get(key)
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}

/// Read and index the XML export from disk.
pub fn read_records(path: &Path) -> Result<RecordIndex> {
    let content = fs::read_to_string(path).map_err(|e| DepositError::io(path, e))?;
    parse_records(&content).map_err(|e| match e {
        DepositError::Xml { source, .. } => DepositError::Xml {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

pub fn parse_records(content: &str) -> Result<RecordIndex> {
    let opts = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(content, opts).map_err(|source| {
        DepositError::Xml {
            path: "<input>".to_string(),
            source,
        }
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != ROOT_ELEMENT {
        return Err(DepositError::missing_element(
            format!("/{ROOT_ELEMENT}"),
            format!("document root is <{}>", root.tag_name().name()),
        ));
    }

    let mut papers = BTreeMap::new();
    for paper in elements(root, "paper") {
        let Some(key) = child_text(paper, &["event_tracking_number"]) else {
            continue;
        };
        if papers.contains_key(&key) {
            return Err(DepositError::DuplicateRecord { key });
        }
        let entry = PaperEntry {
            key: key.clone(),
            title: child_text(paper, &["paper_title"]),
            authors: elements(paper, "authors")
                .flat_map(|a| elements(a, "author"))
                .map(read_author)
                .collect(),
        };
        papers.insert(key, entry);
    }
    Ok(RecordIndex { papers })
}

fn read_author(node: Node<'_, '_>) -> RawAuthor {
    RawAuthor {
        sequence_no: child_text(node, &["sequence_no"]),
        prefix: child_text(node, &["prefix"]),
        first_name: child_text(node, &["first_name"]),
        middle_name: child_text(node, &["middle_name"]),
        last_name: child_text(node, &["last_name"]),
        suffix: child_text(node, &["suffix"]),
        email_address: child_text(node, &["email_address"]),
        orcid: child_text(node, &["ORCID"]),
        institution: child_text(node, &["affiliations", "affiliation", "institution"]),
    }
}

fn elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// First element reached by following `path` through direct children, in document order.
fn find_path<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    path: &[&'static str],
) -> Option<Node<'a, 'input>> {
    match path.split_first() {
        None => Some(node),
        Some((head, rest)) => elements(node, *head).find_map(|child| find_path(child, rest)),
    }
}

/// Trimmed concatenated text of the element at `path`.
fn child_text(node: Node<'_, '_>, path: &[&'static str]) -> Option<String> {
    find_path(node, path).map(|n| {
        n.descendants()
            .filter(|d| d.is_text())
            .filter_map(|d| d.text())
            .collect::<String>()
            .trim()
            .to_string()
    })
}
