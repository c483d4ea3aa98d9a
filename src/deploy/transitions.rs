// ABOUTME: State transition methods for the deployment state machine.
// ABOUTME: Each method consumes self, talks to the console, and returns the next state.

use tokio::sync::watch;

use crate::console::Transport;
use crate::protocol::{BundleShell, InstallReply};
use crate::types::BundleId;

use super::Deployment;
use super::artifacts::ArtifactStore;
use super::error::DeployError;
use super::poll::{PollPolicy, wait_for_uninstall};
use super::state::{ArtifactsRemoved, Cleared, Idle, Installed, Listed, Started, Stopped};

/// Outcome of the install step.
#[derive(Debug)]
pub enum InstallStep {
    /// The console assigned an id; the bundle can be started.
    Installed(Deployment<Installed>),
    /// The console answered without an id. Nothing more is sent.
    Rejected { response: String },
}

impl<S> Deployment<S> {
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            target: self.target,
            state,
        }
    }
}

// =============================================================================
// Idle -> Listed
// =============================================================================

impl Deployment<Idle> {
    /// Ask the console for the bundle currently deployed under this name.
    #[must_use = "deployment state must be used"]
    pub async fn list<T: Transport>(
        self,
        shell: &mut BundleShell<T>,
    ) -> Result<Deployment<Listed>, DeployError> {
        let existing = shell.find_bundle(&self.target.bundle).await?;

        match &existing {
            Some(record) => tracing::info!(
                bundle = %self.target.bundle,
                id = %record.id,
                status = %record.status,
                "found deployed bundle"
            ),
            None => tracing::info!(bundle = %self.target.bundle, "no bundle deployed yet"),
        }

        Ok(self.transition(Listed { existing }))
    }
}

// =============================================================================
// Listed -> Stopped
// =============================================================================

impl Deployment<Listed> {
    /// Stop the previous bundle, if there is one.
    #[must_use = "deployment state must be used"]
    pub async fn stop_existing<T: Transport>(
        self,
        shell: &mut BundleShell<T>,
    ) -> Result<Deployment<Stopped>, DeployError> {
        if let Some(record) = &self.state.existing {
            shell.stop(&record.id).await?;
            tracing::info!(id = %record.id, "stopped previous bundle");
        }

        let existing = self.state.existing.clone();
        Ok(self.transition(Stopped { existing }))
    }
}

// =============================================================================
// Stopped -> ArtifactsRemoved
// =============================================================================

impl Deployment<Stopped> {
    /// Delete packaged artifacts left by an earlier build.
    ///
    /// Skipped on a first deploy: with no bundle on the console there is
    /// nothing the artifacts could still be backing.
    #[must_use = "deployment state must be used"]
    pub async fn remove_artifacts<A: ArtifactStore + ?Sized>(
        self,
        store: &A,
    ) -> Result<Deployment<ArtifactsRemoved>, DeployError> {
        let removed = if self.state.existing.is_some() {
            remove_artifacts(store, &self.target.artifacts).await?
        } else {
            Vec::new()
        };

        let existing = self.state.existing.clone();
        Ok(self.transition(ArtifactsRemoved { existing, removed }))
    }
}

/// Delete matching artifacts, mapping I/O failures to `ArtifactRemoval`.
pub(crate) async fn remove_artifacts<A: ArtifactStore + ?Sized>(
    store: &A,
    pattern: &super::ArtifactPattern,
) -> Result<Vec<std::path::PathBuf>, DeployError> {
    let removed = store
        .remove_matching(pattern)
        .await
        .map_err(|source| DeployError::ArtifactRemoval {
            pattern: pattern.to_string(),
            source,
        })?;

    tracing::debug!(pattern = %pattern, count = removed.len(), "artifact removal finished");
    Ok(removed)
}

// =============================================================================
// ArtifactsRemoved -> Cleared
// =============================================================================

impl Deployment<ArtifactsRemoved> {
    /// Uninstall the previous bundle and wait until the console drops it.
    ///
    /// Only runs when artifacts were removed; otherwise the stopped bundle is
    /// left in place and the new one installs alongside it.
    #[must_use = "deployment state must be used"]
    pub async fn uninstall_previous<T: Transport>(
        self,
        shell: &mut BundleShell<T>,
        policy: &PollPolicy,
        cancel: &mut Option<watch::Receiver<bool>>,
    ) -> Result<Deployment<Cleared>, DeployError> {
        let replaced = self.state.existing.as_ref().map(|r| r.id.clone());

        if let (Some(id), false) = (&replaced, self.state.removed.is_empty()) {
            uninstall_and_wait(shell, &self.target.bundle, id, policy, cancel).await?;
        }

        Ok(self.transition(Cleared { replaced }))
    }
}

/// `uninstall <id>` followed by the listing poll.
pub(crate) async fn uninstall_and_wait<T: Transport>(
    shell: &mut BundleShell<T>,
    bundle: &crate::types::BundleName,
    id: &BundleId,
    policy: &PollPolicy,
    cancel: &mut Option<watch::Receiver<bool>>,
) -> Result<(), DeployError> {
    shell.uninstall(id).await?;
    let attempts = wait_for_uninstall(shell, bundle, policy, cancel).await?;
    tracing::info!(id = %id, attempts, "previous bundle uninstalled");
    Ok(())
}

// =============================================================================
// Cleared -> Installed
// =============================================================================

impl Deployment<Cleared> {
    /// Install the web bundle directory.
    #[must_use = "deployment state must be used"]
    pub async fn install<T: Transport>(
        self,
        shell: &mut BundleShell<T>,
    ) -> Result<InstallStep, DeployError> {
        let uri = self.target.install_uri();

        match shell.install(&uri).await? {
            InstallReply::Installed(id) => {
                tracing::info!(id = %id, uri = %uri, "installed web bundle");
                let replaced = self.state.replaced.clone();
                Ok(InstallStep::Installed(
                    self.transition(Installed { id, replaced }),
                ))
            }
            InstallReply::Rejected(response) => {
                tracing::warn!(
                    uri = %uri,
                    response = %response.trim(),
                    "console did not report a bundle id for install"
                );
                Ok(InstallStep::Rejected { response })
            }
        }
    }
}

// =============================================================================
// Installed -> Started
// =============================================================================

impl Deployment<Installed> {
    /// Start the freshly installed bundle.
    #[must_use = "deployment state must be used"]
    pub async fn start<T: Transport>(
        self,
        shell: &mut BundleShell<T>,
    ) -> Result<Deployment<Started>, DeployError> {
        shell.start(&self.state.id).await?;
        tracing::info!(id = %self.state.id, "started web bundle");

        let Installed { id, replaced } = self.state.clone();
        Ok(self.transition(Started { id, replaced }))
    }
}

// =============================================================================
// Started -> done
// =============================================================================

impl Deployment<Started> {
    /// Finish the deployment, returning the running id and the id it replaced.
    pub fn finish(self) -> (BundleId, Option<BundleId>) {
        (self.state.id, self.state.replaced)
    }
}
