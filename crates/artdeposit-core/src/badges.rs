//! Evaluation badges and their mapping to MODS topics.

use crate::config::BadgeDef;
use crate::errors::Result;
use crate::input::ArtifactRow;
use std::collections::BTreeSet;

/// Badge tokens found in a row's badge columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeSet {
    tokens: BTreeSet<String>,
}

impl BadgeSet {
    /// Collect the non-empty trimmed values of `columns`. Every column must be present.
    pub fn from_row(row: &ArtifactRow, columns: &[String]) -> Result<Self> {
        let mut tokens = BTreeSet::new();
        for column in columns {
            let value = row.require(column)?;
            if !value.is_empty() {
                tokens.insert(value.to_string());
            }
        }
        Ok(Self { tokens })
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Table entries present in this set, in table order. Tokens outside the table are dropped.
    pub fn topics<'t>(&self, table: &'t [BadgeDef]) -> Vec<&'t BadgeDef> {
        table.iter().filter(|b| self.contains(&b.token)).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for BadgeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}
