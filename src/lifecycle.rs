// ABOUTME: Entry points consumed by the theme build pipeline.
// ABOUTME: Binds one deployment target to one console session and exposes deploy/uninstall.

use std::path::{Path, PathBuf};
use tokio::sync::watch;

use crate::config::Config;
use crate::console::{ConsoleConnection, Result as ConsoleResult, Transport};
use crate::deploy::{
    ArtifactStore, DeployError, DeployOutcome, Deployer, DeploymentTarget, FsArtifacts,
    PollPolicy, UninstallOutcome,
};
use crate::protocol::{BundleRecord, BundleShell};

/// Kind of file change reported by the watch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Changed,
    Added,
    Deleted,
}

/// A file change that triggered a redeploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Whether the change touched a stylesheet source. Pipelines that only
    /// recompile CSS in watch mode can use this to skip a full redeploy.
    pub fn is_stylesheet(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("css" | "scss" | "sass")
        )
    }
}

/// Deploys and uninstalls one theme over an exclusively owned console session.
///
/// The build pipeline must not call into this concurrently; `&mut self`
/// makes that a compile-time guarantee within one process.
#[derive(Debug)]
pub struct ThemeLifecycle<T, A> {
    target: DeploymentTarget,
    deployer: Deployer<T, A>,
}

impl ThemeLifecycle<ConsoleConnection, FsArtifacts> {
    /// Connect to the console named in `config`.
    pub async fn connect(config: &Config) -> crate::error::Result<Self> {
        let target = config.target()?;
        let connection = ConsoleConnection::connect(config.connection_config()).await?;
        let deployer = Deployer::new(BundleShell::from_transport(connection), FsArtifacts)
            .poll_policy(config.poll.policy());
        Ok(Self::new(target, deployer))
    }
}

impl<T: Transport, A: ArtifactStore> ThemeLifecycle<T, A> {
    pub fn new(target: DeploymentTarget, deployer: Deployer<T, A>) -> Self {
        Self { target, deployer }
    }

    /// Build a lifecycle straight from a transport and artifact store.
    pub fn with_transport(
        target: DeploymentTarget,
        transport: T,
        artifacts: A,
        poll: PollPolicy,
    ) -> Self {
        let deployer = Deployer::new(BundleShell::from_transport(transport), artifacts)
            .poll_policy(poll);
        Self::new(target, deployer)
    }

    /// Allow the uninstall wait to be cancelled through `cancel`.
    pub fn cancellation(self, cancel: watch::Receiver<bool>) -> Self {
        Self {
            target: self.target,
            deployer: self.deployer.cancellation(cancel),
        }
    }

    pub fn target(&self) -> &DeploymentTarget {
        &self.target
    }

    pub fn theme_path(&self) -> &Path {
        self.target.theme_path()
    }

    /// Replace whatever is deployed with the current web bundle directory.
    pub async fn deploy(&mut self) -> Result<DeployOutcome, DeployError> {
        let outcome = self.deployer.deploy(&self.target).await?;
        if let DeployOutcome::InstallRejected { response } = &outcome {
            tracing::warn!(
                bundle = %self.target.bundle,
                "install rejected, bundle not started: {}",
                response.trim()
            );
        }
        Ok(outcome)
    }

    /// Remove the theme's artifacts and bundle; a no-op if nothing was deployed.
    pub async fn uninstall(&mut self) -> Result<UninstallOutcome, DeployError> {
        self.deployer.uninstall(&self.target).await
    }

    /// Redeploy in response to a change from the watch pipeline.
    pub async fn handle_change(&mut self, event: &ChangeEvent) -> Result<DeployOutcome, DeployError> {
        tracing::info!(
            path = %event.path.display(),
            kind = ?event.kind,
            "change detected, redeploying"
        );
        self.deploy().await
    }

    /// Bundle the console currently lists for this theme.
    pub async fn status(&mut self) -> ConsoleResult<Option<BundleRecord>> {
        self.deployer.status(&self.target).await
    }

    /// Close the console session.
    pub async fn close(self) -> ConsoleResult<T> {
        self.deployer.close().await
    }
}
