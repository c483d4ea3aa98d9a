// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers console failures, artifact removal, and the uninstall wait.

use crate::console::ConsoleError;

/// Errors that abort a deploy or uninstall.
///
/// A bundle missing from the listing and an install the console refused are
/// not errors; they are ordinary outcomes.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The console session failed. Never retried.
    #[error("console session failed: {0}")]
    Console(#[from] ConsoleError),

    /// Deleting packaged artifacts failed part way.
    #[error("failed to remove artifacts matching {pattern}: {source}")]
    ArtifactRemoval {
        pattern: String,
        #[source]
        source: std::io::Error,
    },

    /// The bundle was still listed when the uninstall wait ran out of checks.
    #[error("bundle {bundle} still installed after {attempts} checks")]
    UninstallTimeout { bundle: String, attempts: u32 },

    /// The uninstall wait was cancelled.
    #[error("cancelled while waiting for bundle {bundle} to uninstall")]
    Cancelled { bundle: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Connection,
    Filesystem,
    Timeout,
    Cancelled,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Console(_) => DeployErrorKind::Connection,
            DeployError::ArtifactRemoval { .. } => DeployErrorKind::Filesystem,
            DeployError::UninstallTimeout { .. } => DeployErrorKind::Timeout,
            DeployError::Cancelled { .. } => DeployErrorKind::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        let err = DeployError::UninstallTimeout {
            bundle: "acme".to_string(),
            attempts: 3,
        };
        assert_eq!(err.kind(), DeployErrorKind::Timeout);
        assert!(err.to_string().contains("acme"));
        assert!(err.to_string().contains('3'));

        let err = DeployError::ArtifactRemoval {
            pattern: "dist/acme*.war".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.kind(), DeployErrorKind::Filesystem);
        assert!(err.to_string().contains("dist/acme*.war"));

        let err = DeployError::Cancelled {
            bundle: "acme".to_string(),
        };
        assert_eq!(err.kind(), DeployErrorKind::Cancelled);
    }
}
