// ABOUTME: Drives the deployment state machine over one exclusively owned console session.
// ABOUTME: Provides the deploy and uninstall sequences plus a read-only status query.

use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::Instrument;

use crate::console::{Result as ConsoleResult, Transport};
use crate::protocol::{BundleRecord, BundleShell};
use crate::types::BundleId;

use super::Deployment;
use super::artifacts::ArtifactStore;
use super::error::DeployError;
use super::poll::PollPolicy;
use super::target::DeploymentTarget;
use super::transitions::{InstallStep, remove_artifacts, uninstall_and_wait};

/// How a deploy ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeployOutcome {
    /// The new bundle is installed and started.
    Started {
        id: BundleId,
        replaced: Option<BundleId>,
    },
    /// The console did not report an id for the install; `start` was not sent.
    InstallRejected { response: String },
}

/// How an uninstall ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UninstallOutcome {
    /// No artifacts existed, so nothing was ever deployed. No commands sent.
    NothingDeployed,
    /// Artifacts were removed but the console listed no bundle.
    ArtifactsRemoved { removed: Vec<PathBuf> },
    /// Artifacts were removed and the bundle stopped and uninstalled.
    Uninstalled { id: BundleId, removed: Vec<PathBuf> },
}

/// Owner of the console session for the lifetime of a build process.
///
/// All operations take `&mut self`, so two deploys cannot interleave their
/// commands on the session.
pub struct Deployer<T, A> {
    shell: BundleShell<T>,
    artifacts: A,
    poll: PollPolicy,
    cancel: Option<watch::Receiver<bool>>,
}

impl<T, A> std::fmt::Debug for Deployer<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deployer")
            .field("poll", &self.poll)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

impl<T: Transport, A: ArtifactStore> Deployer<T, A> {
    pub fn new(shell: BundleShell<T>, artifacts: A) -> Self {
        Self {
            shell,
            artifacts,
            poll: PollPolicy::default(),
            cancel: None,
        }
    }

    pub fn poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll = policy;
        self
    }

    /// Let the uninstall wait be cancelled by sending `true` on the channel.
    pub fn cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn shell(&self) -> &BundleShell<T> {
        &self.shell
    }

    /// Replace the previous deployment of `target` with its web bundle directory.
    ///
    /// list → [stop → remove artifacts → [uninstall → poll]] → install → start
    pub async fn deploy(&mut self, target: &DeploymentTarget) -> Result<DeployOutcome, DeployError> {
        let span = tracing::info_span!("deploy", bundle = %target.bundle);
        self.run_deploy(target).instrument(span).await
    }

    async fn run_deploy(&mut self, target: &DeploymentTarget) -> Result<DeployOutcome, DeployError> {
        let cleared = Deployment::new(target.clone())
            .list(&mut self.shell)
            .await?
            .stop_existing(&mut self.shell)
            .await?
            .remove_artifacts(&self.artifacts)
            .await?
            .uninstall_previous(&mut self.shell, &self.poll, &mut self.cancel)
            .await?;

        let installed = match cleared.install(&mut self.shell).await? {
            InstallStep::Installed(installed) => installed,
            InstallStep::Rejected { response } => {
                return Ok(DeployOutcome::InstallRejected { response });
            }
        };

        let (id, replaced) = installed.start(&mut self.shell).await?.finish();
        Ok(DeployOutcome::Started { id, replaced })
    }

    /// Remove the theme's artifacts and, if any existed, its bundle.
    pub async fn uninstall(
        &mut self,
        target: &DeploymentTarget,
    ) -> Result<UninstallOutcome, DeployError> {
        let span = tracing::info_span!("uninstall", bundle = %target.bundle);
        self.run_uninstall(target).instrument(span).await
    }

    async fn run_uninstall(
        &mut self,
        target: &DeploymentTarget,
    ) -> Result<UninstallOutcome, DeployError> {
        let removed = remove_artifacts(&self.artifacts, &target.artifacts).await?;
        if removed.is_empty() {
            tracing::info!("no artifacts found, nothing to uninstall");
            return Ok(UninstallOutcome::NothingDeployed);
        }

        let Some(record) = self.shell.find_bundle(&target.bundle).await? else {
            tracing::info!(count = removed.len(), "artifacts removed, no bundle listed");
            return Ok(UninstallOutcome::ArtifactsRemoved { removed });
        };

        self.shell.stop(&record.id).await?;
        uninstall_and_wait(
            &mut self.shell,
            &target.bundle,
            &record.id,
            &self.poll,
            &mut self.cancel,
        )
        .await?;

        Ok(UninstallOutcome::Uninstalled {
            id: record.id,
            removed,
        })
    }

    /// Bundle currently listed for `target`, if any.
    pub async fn status(&mut self, target: &DeploymentTarget) -> ConsoleResult<Option<BundleRecord>> {
        self.shell.find_bundle(&target.bundle).await
    }

    /// Close the console session.
    pub async fn close(self) -> ConsoleResult<T> {
        self.shell.close().await
    }
}
