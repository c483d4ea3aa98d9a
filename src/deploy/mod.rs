// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Deployment struct, and the Deployer driving them.

mod artifacts;
mod deployer;
mod deployment;
mod error;
mod lock;
mod poll;
mod state;
mod target;
mod transitions;

pub use artifacts::{ArtifactStore, FsArtifacts};
pub use deployer::{DeployOutcome, Deployer, UninstallOutcome};
pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind};
pub use lock::{DeployLock, LockError, LockInfo};
pub use poll::PollPolicy;
pub use state::{ArtifactsRemoved, Cleared, Idle, Installed, Listed, Started, Stopped};
pub use target::{ArtifactPattern, DEFAULT_WEB_BUNDLE_DIR, DeploymentTarget};
pub use transitions::InstallStep;
