// ABOUTME: Deploy lock preventing two processes from driving the same bundle at once.
// ABOUTME: Uses atomic file creation with lock info stored under the theme's .webbundle/ dir.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::types::BundleName;

/// Directory, relative to the theme, holding lock files.
const STATE_DIR: &str = ".webbundle";

/// Errors acquiring or releasing the deploy lock.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("bundle {bundle} is locked by {holder} (pid {pid}) since {started_at}")]
    Held {
        bundle: String,
        holder: String,
        pid: u32,
        started_at: DateTime<Utc>,
    },

    #[error("lock at {0} was taken by another process while breaking it")]
    Contended(PathBuf),

    #[error("lock file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize lock info: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Information about who holds a deploy lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine that holds the lock.
    pub holder: String,
    /// Process ID of the lock holder.
    pub pid: u32,
    /// When the lock was acquired.
    pub started_at: DateTime<Utc>,
    /// Bundle being deployed.
    pub bundle: String,
}

impl LockInfo {
    /// Create new lock info for the current process.
    pub fn new(bundle: &BundleName) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            bundle: bundle.to_string(),
        }
    }

    /// Check if this lock is stale (older than 1 hour).
    pub fn is_stale(&self) -> bool {
        let age = Utc::now() - self.started_at;
        age.num_hours() >= 1
    }

    /// Path to the lock file for a bundle.
    pub fn lock_path(theme_path: &Path, bundle: &BundleName) -> PathBuf {
        theme_path.join(STATE_DIR).join(format!("{bundle}.lock"))
    }
}

/// A held deploy lock that releases on drop.
#[derive(Debug)]
pub struct DeployLock {
    path: PathBuf,
    released: bool,
}

impl DeployLock {
    /// Acquire the lock for `bundle`.
    ///
    /// Auto-breaks stale locks (>1 hour) and unreadable lock files with a
    /// warning; `force` breaks any lock.
    pub fn acquire(theme_path: &Path, bundle: &BundleName, force: bool) -> Result<Self, LockError> {
        let path = LockInfo::lock_path(theme_path, bundle);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let info = LockInfo::new(bundle);
        let json = serde_json::to_string(&info)?;

        if Self::try_create(&path, &json)? {
            return Ok(Self {
                path,
                released: false,
            });
        }

        match Self::read_existing(&path) {
            Some(existing) if !force && !existing.is_stale() => {
                return Err(LockError::Held {
                    bundle: existing.bundle,
                    holder: existing.holder,
                    pid: existing.pid,
                    started_at: existing.started_at,
                });
            }
            Some(existing) => tracing::warn!(
                "Breaking {} lock held by {} (pid {}) since {}",
                if force { "forced" } else { "stale" },
                existing.holder,
                existing.pid,
                existing.started_at
            ),
            None => tracing::warn!("Lock info at {} unreadable, breaking lock", path.display()),
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        if Self::try_create(&path, &json)? {
            Ok(Self {
                path,
                released: false,
            })
        } else {
            Err(LockError::Contended(path))
        }
    }

    /// Atomically create the lock file. `false` if it already exists.
    fn try_create(path: &Path, contents: &str) -> Result<bool, LockError> {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())?;
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read_existing(path: &Path) -> Option<LockInfo> {
        let contents = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock.
    pub fn release(mut self) -> Result<(), LockError> {
        self.released = true;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for DeployLock {
    fn drop(&mut self) {
        if !self.released {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
