// ABOUTME: Numeric bundle identifier assigned by the console.
// ABOUTME: Only ever built from digits scraped out of console output.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("bundle id must be a non-empty run of digits, got '{0}'")]
pub struct BundleIdError(String);

/// Identifier of an installed bundle, e.g. `474`.
#[must_use = "IDs reference installed bundles and should not be ignored"]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleId(String);

impl BundleId {
    pub fn parse(value: &str) -> Result<Self, BundleIdError> {
        let value = value.trim();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BundleIdError(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for BundleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
