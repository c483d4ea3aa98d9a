// ABOUTME: Scrapes bundle records out of the console's free-form text output.
// ABOUTME: Pattern-driven so padding, headers, and command echo do not disturb it.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::types::BundleId;

/// `<id>|<status>|<level>|<update location>` with arbitrary padding. Columns
/// past the fourth are ignored.
static LISTING_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(\d+)[ \t]*\|([^|\r\n]*)\|([^|\r\n]*)\|([^|\r\n]*)")
        .expect("listing row pattern is valid")
});

static INSTALLED_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bundle ID:[ \t]*(\d+)").expect("bundle id pattern is valid"));

/// Lifecycle state reported by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BundleStatus {
    Installed,
    Resolved,
    Starting,
    Active,
    Stopping,
    Uninstalled,
    /// Anything the console printed that is not one of the above.
    Unknown,
}

impl BundleStatus {
    pub fn parse(value: &str) -> Self {
        const KNOWN: [BundleStatus; 6] = [
            BundleStatus::Installed,
            BundleStatus::Resolved,
            BundleStatus::Starting,
            BundleStatus::Active,
            BundleStatus::Stopping,
            BundleStatus::Uninstalled,
        ];

        let value = value.trim();
        KNOWN
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(BundleStatus::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BundleStatus::Installed => "Installed",
            BundleStatus::Resolved => "Resolved",
            BundleStatus::Starting => "Starting",
            BundleStatus::Active => "Active",
            BundleStatus::Stopping => "Stopping",
            BundleStatus::Uninstalled => "Uninstalled",
            BundleStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BundleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the bundle table. Rebuilt from every query, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleRecord {
    pub id: BundleId,
    pub level: String,
    pub status: BundleStatus,
    pub update_location: String,
}

impl BundleRecord {
    /// Whether this bundle is served under exactly `context_path`.
    ///
    /// The listing grep is a substring match, so `acme` also pulls in
    /// `acme-admin`; the `Web-ContextPath` query parameter is what tells
    /// them apart.
    pub fn serves(&self, context_path: &str) -> bool {
        let Some((_, query)) = self.update_location.split_once('?') else {
            return false;
        };
        query
            .split('&')
            .filter_map(|param| param.strip_prefix("Web-ContextPath="))
            .any(|value| value == context_path)
    }

    fn from_captures(captures: &regex::Captures<'_>) -> Option<Self> {
        Some(BundleRecord {
            id: BundleId::parse(&captures[1]).ok()?,
            status: BundleStatus::parse(&captures[2]),
            level: captures[3].trim().to_string(),
            update_location: captures[4].trim().to_string(),
        })
    }
}

/// First bundle row in `text`, or `None` when the console listed nothing.
pub fn parse_bundle_listing(text: &str) -> Option<BundleRecord> {
    LISTING_ROW
        .captures_iter(text)
        .find_map(|captures| BundleRecord::from_captures(&captures))
}

/// First bundle row in `text` served under `context_path`, skipping rows
/// for other bundles whose location merely contains the same name.
pub fn parse_bundle_listing_for(text: &str, context_path: &str) -> Option<BundleRecord> {
    LISTING_ROW
        .captures_iter(text)
        .filter_map(|captures| BundleRecord::from_captures(&captures))
        .find(|record| record.serves(context_path))
}

/// Id reported by a successful `install`, or `None` when the console
/// answered with anything else (typically an error message).
pub fn parse_installed_bundle_id(text: &str) -> Option<BundleId> {
    let captures = INSTALLED_ID.captures(text)?;
    BundleId::parse(&captures[1]).ok()
}
