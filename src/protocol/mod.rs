// ABOUTME: Gogo shell command protocol for bundle management.
// ABOUTME: Command construction, response scraping, and typed bundle operations.

mod command;
mod parser;
mod shell;

pub use command::{Command, Verb, bundle_filter};
pub use parser::{
    BundleRecord, BundleStatus, parse_bundle_listing, parse_bundle_listing_for,
    parse_installed_bundle_id,
};
pub use shell::{BundleShell, InstallReply};
