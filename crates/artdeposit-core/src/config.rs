//! Run configuration.
//!
//! Loaded once from YAML before the run and passed by reference to every
//! component; nothing mutates it afterwards.

use crate::errors::{DepositError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One row of the badge vocabulary: CSV token → MODS topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeDef {
    /// Value found in a badge column, e.g. `#acm:artifacts-available`.
    pub token: String,
    /// `authority` attribute of the emitted topic.
    pub authority: String,
    /// Human readable topic text.
    pub label: String,
}

impl BadgeDef {
    pub fn new(token: &str, authority: &str, label: &str) -> Self {
        Self {
            token: token.to_string(),
            authority: authority.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositConfig {
    /// CSV export, one row per artifact.
    pub artifacts_path: PathBuf,
    /// XML table-of-contents export.
    pub records_path: PathBuf,
    pub output_dir: PathBuf,
    /// Display name used in generated descriptions, e.g. `PPoPP23`.
    pub proceeding_name: String,
    /// Tracking-number prefix, e.g. `ppopp23-p`. The CSV key column is `{prefix}#`.
    pub proceeding_prefix: String,
    pub callback_email: String,
    /// Stamped into archive names, entry timestamps and `dateIssued`.
    pub issue_date: NaiveDate,

    #[serde(default = "default_badge_columns")]
    pub badge_columns: Vec<String>,

    #[serde(default = "default_badges")]
    pub badges: Vec<BadgeDef>,

    /// Emit the `relatedItem` link to the paper DOI.
    #[serde(default = "default_true")]
    pub related_article: bool,
}

fn default_true() -> bool {
    true
}

pub fn default_badge_columns() -> Vec<String> {
    [
        "Available",
        "Functional",
        "Reusable",
        "Replicated",
        "Reproduced",
        "Best",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_badges() -> Vec<BadgeDef> {
    vec![
        BadgeDef::new(
            "#acm:artifacts-available",
            "artifacts_available_v101",
            "Artifacts Available",
        ),
        BadgeDef::new(
            "#acm:artifacts-functional",
            "artifacts_evaluated_functional_v101",
            "Artifacts Evaluated — Functional",
        ),
        BadgeDef::new(
            "#acm:artifacts-reusable",
            "artifacts_evaluated_reusable_v101",
            "Artifacts Evaluated — Reusable",
        ),
        BadgeDef::new(
            "#acm:results-replicated",
            "results_replicated_v101",
            "Results Replicated",
        ),
        BadgeDef::new(
            "#acm:results-reproduced",
            "results_reproduced_v101",
            "Results Reproduced",
        ),
    ]
}

impl DepositConfig {
    /// Load from a YAML file. Relative paths are resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DepositError::io(path, e))?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| DepositError::Config(format!("failed to parse config YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.proceeding_prefix.trim().is_empty() {
            return Err(DepositError::Config("proceedingPrefix is empty".into()));
        }
        if self.proceeding_name.trim().is_empty() {
            return Err(DepositError::Config("proceedingName is empty".into()));
        }
        if self.callback_email.trim().is_empty() {
            return Err(DepositError::Config("callbackEmail is empty".into()));
        }
        for (i, badge) in self.badges.iter().enumerate() {
            if badge.token.is_empty() {
                return Err(DepositError::Config(format!("badges[{i}].token is empty")));
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for p in [
            &mut self.artifacts_path,
            &mut self.records_path,
            &mut self.output_dir,
        ] {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    /// CSV column holding the tracking number.
    pub fn tracking_column(&self) -> String {
        format!("{}#", self.proceeding_prefix)
    }

    /// Key of the XML record for a CSV tracking number.
    pub fn record_key(&self, tracking_number: &str) -> String {
        format!("{}{}", self.proceeding_prefix, tracking_number)
    }

    /// `YYYYMMDD`, used in archive names.
    pub fn issue_date_compact(&self) -> String {
        self.issue_date.format("%Y%m%d").to_string()
    }

    /// `YYYY-MM-DD`, used in `dateIssued`.
    pub fn issue_date_iso(&self) -> String {
        self.issue_date.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> DepositConfig {
    DepositConfig {
        artifacts_path: PathBuf::from("artifacts.csv"),
        records_path: PathBuf::from("acmcms-toc.xml"),
        output_dir: PathBuf::from("artifacts-metadata"),
        proceeding_name: "PPoPP23".into(),
        proceeding_prefix: "ppopp23-p".into(),
        callback_email: "deposits@example.org".into(),
        issue_date: NaiveDate::from_ymd_opt(2023, 1, 6).unwrap(),
        badge_columns: default_badge_columns(),
        badges: default_badges(),
        related_article: true,
    }
}
