// ABOUTME: Deployment state types for the type state pattern.
// ABOUTME: States carry what the next transition needs, so skipped steps are explicit.

use std::path::PathBuf;

use crate::protocol::BundleRecord;
use crate::types::BundleId;

/// Nothing queried yet.
/// Available actions: `list()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

/// Console queried for a previous deployment.
/// Available actions: `stop_existing()`
#[derive(Debug, Clone)]
pub struct Listed {
    pub(crate) existing: Option<BundleRecord>,
}

/// Previous bundle stopped (or there was none).
/// Available actions: `remove_artifacts()`
#[derive(Debug, Clone)]
pub struct Stopped {
    pub(crate) existing: Option<BundleRecord>,
}

/// Packaged artifacts deleted.
/// Available actions: `uninstall_previous()`
#[derive(Debug, Clone)]
pub struct ArtifactsRemoved {
    pub(crate) existing: Option<BundleRecord>,
    pub(crate) removed: Vec<PathBuf>,
}

/// No conflicting bundle left on the console.
/// Available actions: `install()`
#[derive(Debug, Clone)]
pub struct Cleared {
    pub(crate) replaced: Option<BundleId>,
}

/// New bundle installed but not started.
/// Available actions: `start()`
#[derive(Debug, Clone)]
pub struct Installed {
    pub(crate) id: BundleId,
    pub(crate) replaced: Option<BundleId>,
}

/// New bundle started.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Started {
    pub(crate) id: BundleId,
    pub(crate) replaced: Option<BundleId>,
}

impl Listed {
    pub fn existing(&self) -> Option<&BundleRecord> {
        self.existing.as_ref()
    }
}

impl ArtifactsRemoved {
    pub fn removed(&self) -> &[PathBuf] {
        &self.removed
    }
}

impl Installed {
    pub fn id(&self) -> &BundleId {
        &self.id
    }
}

impl Started {
    pub fn id(&self) -> &BundleId {
        &self.id
    }
}
