//! Join CSV rows to XML records by tracking number.

use crate::badges::BadgeSet;
use crate::config::DepositConfig;
use crate::doi::Doi;
use crate::errors::{DepositError, Result};
use crate::input::{ArtifactRow, PaperRecord, RecordIndex};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Sentinel in `Available URL` for artifacts that were never deposited.
pub const UNAVAILABLE: &str = "Unavailable";

pub const TITLE_COLUMN: &str = "Title";
pub const AVAILABLE_URL_COLUMN: &str = "Available URL";
pub const DOI_COLUMN: &str = "DOI";

/// A row joined to its record, ready for document synthesis.
#[derive(Debug, Clone)]
pub struct MatchedArtifact {
    pub tracking_number: String,
    pub record: PaperRecord,
    pub artifact_doi: Doi,
    pub paper_doi: Doi,
    pub badges: BadgeSet,
}

#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Ready(Box<MatchedArtifact>),
    /// `Available URL` was the `Unavailable` sentinel.
    Skipped { tracking_number: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMismatch {
    pub tracking_number: String,
    pub record_title: String,
    pub table_title: String,
}

/// Result of matching every row, in row order.
#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    pub outcomes: Vec<MatchOutcome>,
    pub title_mismatches: Vec<TitleMismatch>,
}

pub struct Matcher<'a> {
    config: &'a DepositConfig,
    records: &'a RecordIndex,
}

impl<'a> Matcher<'a> {
    pub fn new(config: &'a DepositConfig, records: &'a RecordIndex) -> Self {
        Self { config, records }
    }

    /// Match all rows in order. Duplicate tracking numbers and the first
    /// fatal problem on any row abort the whole batch.
    pub fn match_all(&self, rows: &[ArtifactRow]) -> Result<MatchReport> {
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        let mut report = MatchReport::default();

        for row in rows {
            let tracking_number = row.require(&self.config.tracking_column())?;
            if let Some(&first_row) = seen.get(tracking_number) {
                return Err(DepositError::DuplicateTrackingNumber {
                    tracking_number: tracking_number.to_string(),
                    first_row,
                    row: row.row,
                });
            }
            seen.insert(tracking_number.to_string(), row.row);

            let (outcome, mismatch) = self.match_row(row)?;
            report.title_mismatches.extend(mismatch);
            report.outcomes.push(outcome);
        }
        Ok(report)
    }

    /// Match a single row. A title mismatch is returned alongside the outcome
    /// and never fails the row.
    pub fn match_row(&self, row: &ArtifactRow) -> Result<(MatchOutcome, Option<TitleMismatch>)> {
        let tracking_number = row.require(&self.config.tracking_column())?.to_string();
        let table_title = row.require(TITLE_COLUMN)?;

        let entry = self
            .records
            .get(&self.config.record_key(&tracking_number))
            .ok_or_else(|| DepositError::MissingRecord {
                tracking_number: tracking_number.clone(),
            })?;
        let record_title = entry.title()?;

        let mismatch = if record_title == table_title {
            info!("#{}:\t{}", tracking_number, record_title);
            None
        } else {
            warn!(
                "#{} title differs\n  (XML):\t{}\n  (CSV):\t{}",
                tracking_number, record_title, table_title
            );
            Some(TitleMismatch {
                tracking_number: tracking_number.clone(),
                record_title: record_title.to_string(),
                table_title: table_title.to_string(),
            })
        };

        let available_url = row.require(AVAILABLE_URL_COLUMN)?;
        if available_url == UNAVAILABLE {
            info!("skipping #{}: artifact unavailable", tracking_number);
            return Ok((MatchOutcome::Skipped { tracking_number }, mismatch));
        }

        let artifact_doi = Doi::parse(available_url)?;
        let paper_doi = Doi::parse(row.require(DOI_COLUMN)?)?;
        let badges = BadgeSet::from_row(row, &self.config.badge_columns)?;
        let record = entry.to_record()?;

        let matched = MatchedArtifact {
            tracking_number,
            record,
            artifact_doi,
            paper_doi,
            badges,
        };
        Ok((MatchOutcome::Ready(Box::new(matched)), mismatch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::input::parse_records;

    const HEADER: &str = "ppopp23-p#,Title,Available URL,DOI,Available,Functional,Reusable,Replicated,Reproduced,Best";

    fn records() -> RecordIndex {
        parse_records(
            "<erights_record>\
             <paper><event_tracking_number>ppopp23-p42</event_tracking_number>\
             <paper_title>Fast Caches</paper_title><authors/></paper>\
             <paper><event_tracking_number>ppopp23-p7</event_tracking_number>\
             <paper_title>Slow Queues</paper_title></paper>\
             </erights_record>",
        )
        .unwrap()
    }

    fn rows(body: &str) -> Vec<ArtifactRow> {
        crate::input::parse_artifacts(&format!("{HEADER}\n{body}")).unwrap()
    }

    #[test]
    fn joins_rows_in_row_order() {
        let cfg = test_config();
        let idx = records();
        let rows = rows(
            "7,Slow Queues,https://doi.org/10.5281/zenodo.7,10.1145/7,#acm:artifacts-available,,,,,\n\
             42,Fast Caches,https://doi.org/10.1145/zenodo.999,10.1145/3456789,#acm:artifacts-available,#acm:artifacts-functional,,,,\n",
        );
        let report = Matcher::new(&cfg, &idx).match_all(&rows).unwrap();
        assert!(report.title_mismatches.is_empty());
        let keys: Vec<&str> = report
            .outcomes
            .iter()
            .map(|o| match o {
                MatchOutcome::Ready(m) => m.tracking_number.as_str(),
                MatchOutcome::Skipped { .. } => panic!("unexpected skip"),
            })
            .collect();
        assert_eq!(keys, vec!["7", "42"]);

        let MatchOutcome::Ready(m) = &report.outcomes[1] else {
            unreachable!()
        };
        assert_eq!(m.artifact_doi.suffix(), "zenodo.999");
        assert_eq!(m.paper_doi.full(), "10.1145/3456789");
        assert_eq!(m.badges.len(), 2);
        assert_eq!(m.record.title, "Fast Caches");
    }

    #[test]
    fn title_mismatch_is_reported_not_fatal() {
        let cfg = test_config();
        let idx = records();
        let rows = rows("42, Fast  Caches ,10.1145/zenodo.999,10.1145/1,,,,,,\n");
        let report = Matcher::new(&cfg, &idx).match_all(&rows).unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(
            report.title_mismatches,
            vec![TitleMismatch {
                tracking_number: "42".into(),
                record_title: "Fast Caches".into(),
                table_title: "Fast  Caches".into(),
            }]
        );
    }

    #[test]
    fn unavailable_rows_are_skipped_before_doi_validation() {
        let cfg = test_config();
        let idx = records();
        let rows = rows("42,Fast Caches,Unavailable,not-a-doi,,,,,,\n");
        let report = Matcher::new(&cfg, &idx).match_all(&rows).unwrap();
        assert!(matches!(
            &report.outcomes[0],
            MatchOutcome::Skipped { tracking_number } if tracking_number == "42"
        ));
    }

    #[test]
    fn missing_record_is_fatal_even_for_skipped_rows() {
        let cfg = test_config();
        let idx = records();
        let rows = rows("99,Ghost,Unavailable,,,,,,,\n");
        assert!(matches!(
            Matcher::new(&cfg, &idx).match_all(&rows),
            Err(DepositError::MissingRecord { tracking_number }) if tracking_number == "99"
        ));
    }

    #[test]
    fn duplicate_tracking_numbers_are_fatal() {
        let cfg = test_config();
        let idx = records();
        let rows = rows(
            "42,Fast Caches,Unavailable,,,,,,,\n\
             42,Fast Caches,Unavailable,,,,,,,\n",
        );
        assert!(matches!(
            Matcher::new(&cfg, &idx).match_all(&rows),
            Err(DepositError::DuplicateTrackingNumber { first_row: 1, row: 2, .. })
        ));
    }

    #[test]
    fn malformed_dois_are_fatal() {
        let cfg = test_config();
        let idx = records();
        let bad_artifact = rows("42,Fast Caches,https://github.com/x/y,10.1145/1,,,,,,\n");
        assert!(matches!(
            Matcher::new(&cfg, &idx).match_all(&bad_artifact),
            Err(DepositError::MalformedIdentifier { value }) if value == "https://github.com/x/y"
        ));

        let bad_paper = rows("42,Fast Caches,10.1145/zenodo.1,3456789,,,,,,\n");
        assert!(matches!(
            Matcher::new(&cfg, &idx).match_all(&bad_paper),
            Err(DepositError::MalformedIdentifier { value }) if value == "3456789"
        ));
    }

    #[test]
    fn missing_key_column_is_fatal() {
        let cfg = test_config();
        let idx = records();
        let rows = crate::input::parse_artifacts("Title\nFast Caches\n").unwrap();
        assert!(matches!(
            Matcher::new(&cfg, &idx).match_all(&rows),
            Err(DepositError::MissingColumn { column, .. }) if column == "ppopp23-p#"
        ));
    }
}
