//! DOI parsing and rendering.
//!
//! Accepts `prefix/suffix`, `doi:prefix/suffix` and
//! `http(s)://[dx.]doi.org/prefix/suffix`. Only the (prefix, suffix) pair is
//! stored; both textual forms are rendered from it.

use crate::errors::{DepositError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref DOI_PATTERN: Regex =
        Regex::new(r"^(?:doi:|https?://(?:dx\.)?doi\.org/)?(10\.[.\d]+)/([^/]+)$").unwrap();
}

/// Resolver base used by [`Doi::url`].
pub const DOI_RESOLVER: &str = "https://doi.org/";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Doi {
    prefix: String,
    suffix: String,
}

impl Doi {
    /// Parse any accepted form. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let caps = DOI_PATTERN
            .captures(input.trim())
            .ok_or_else(|| DepositError::MalformedIdentifier {
                value: input.to_string(),
            })?;
        Ok(Self {
            prefix: caps[1].to_string(),
            suffix: caps[2].to_string(),
        })
    }

    /// Registrant prefix, e.g. `10.1145`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// `prefix/suffix`
    pub fn full(&self) -> String {
        format!("{}/{}", self.prefix, self.suffix)
    }

    /// `https://doi.org/prefix/suffix`
    pub fn url(&self) -> String {
        format!("{}{}/{}", DOI_RESOLVER, self.prefix, self.suffix)
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.suffix)
    }
}

impl FromStr for Doi {
    type Err = DepositError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
