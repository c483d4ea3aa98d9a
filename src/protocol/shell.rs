// ABOUTME: Typed bundle operations over a console session.
// ABOUTME: Each call sends one command and waits for its reply before returning.

use super::command::{Command, bundle_filter};
use super::parser::{BundleRecord, parse_bundle_listing_for, parse_installed_bundle_id};
use crate::console::{Console, Result, Transport};
use crate::locator::context_path;
use crate::types::{BundleId, BundleName};

/// Result of an `install` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReply {
    /// The console assigned this id.
    Installed(BundleId),
    /// No id in the reply; carries the raw console text for reporting.
    Rejected(String),
}

/// Bundle lifecycle commands with strict request/response sequencing.
///
/// There is no way to queue a command behind another: every method borrows
/// the shell mutably for the full round trip.
#[derive(Debug)]
pub struct BundleShell<T> {
    console: Console<T>,
}

impl<T: Transport> BundleShell<T> {
    pub fn new(console: Console<T>) -> Self {
        Self { console }
    }

    pub fn from_transport(transport: T) -> Self {
        Self::new(Console::new(transport))
    }

    /// Look up the bundle deployed for `bundle`, if any.
    ///
    /// The grep narrows the table on the console side; the row is then
    /// picked by its context path so sibling bundles never match.
    pub async fn find_bundle(&mut self, bundle: &BundleName) -> Result<Option<BundleRecord>> {
        let command = Command::list(&bundle_filter(bundle));
        let response = self.console.send_command(&command).await?;
        Ok(parse_bundle_listing_for(&response, &context_path(bundle)))
    }

    pub async fn stop(&mut self, id: &BundleId) -> Result<String> {
        self.console.send_command(&Command::stop(id)).await
    }

    pub async fn start(&mut self, id: &BundleId) -> Result<String> {
        self.console.send_command(&Command::start(id)).await
    }

    pub async fn uninstall(&mut self, id: &BundleId) -> Result<String> {
        self.console.send_command(&Command::uninstall(id)).await
    }

    pub async fn install(&mut self, uri: &str) -> Result<InstallReply> {
        let response = self.console.send_command(&Command::install(uri)).await?;
        Ok(match parse_installed_bundle_id(&response) {
            Some(id) => InstallReply::Installed(id),
            None => InstallReply::Rejected(response),
        })
    }

    pub fn console(&self) -> &Console<T> {
        &self.console
    }

    /// Close the underlying session.
    pub async fn close(self) -> Result<T> {
        self.console.close().await
    }
}
