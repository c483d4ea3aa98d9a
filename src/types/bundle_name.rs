// ABOUTME: Bundle name validation.
// ABOUTME: Names end up inside console commands and context paths, so the charset is narrow.

use serde::{Deserialize, Deserializer};
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BundleNameError {
    #[error("bundle name cannot be empty")]
    Empty,

    #[error("bundle name exceeds maximum length of 128 characters")]
    TooLong,

    #[error("bundle name cannot start with '{0}'")]
    InvalidStart(char),

    #[error("invalid character in bundle name: '{0}'")]
    InvalidChar(char),
}

/// Name of the theme bundle, also its context path without the leading slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleName(String);

impl BundleName {
    pub fn new(value: &str) -> Result<Self, BundleNameError> {
        let Some(first) = value.chars().next() else {
            return Err(BundleNameError::Empty);
        };

        if value.len() > MAX_LEN {
            return Err(BundleNameError::TooLong);
        }

        if first == '-' || first == '.' {
            return Err(BundleNameError::InvalidStart(first));
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.'))
        {
            return Err(BundleNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BundleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for BundleName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BundleName::new(&s).map_err(serde::de::Error::custom)
    }
}
