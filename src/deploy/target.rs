// ABOUTME: What gets deployed and where its artifacts live.
// ABOUTME: Resolves the web bundle directory URI and the artifact glob for a theme.

use std::path::{Path, PathBuf};

use crate::locator::{PlatformFamily, context_path, web_bundle_dir_uri};
use crate::types::BundleName;

/// Default directory, relative to the theme, holding the exploded bundle.
pub const DEFAULT_WEB_BUNDLE_DIR: &str = ".web_bundle_dir";

/// Packaged artifacts named `<dir>/<bundle>*.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPattern {
    pub dir: PathBuf,
    pub prefix: String,
    pub extension: String,
}

impl ArtifactPattern {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Whether a file name in `dir` matches the pattern.
    pub fn matches(&self, file_name: &str) -> bool {
        let Some(stem) = file_name.strip_suffix(&self.extension) else {
            return false;
        };
        let Some(stem) = stem.strip_suffix('.') else {
            return false;
        };
        stem.starts_with(&self.prefix)
    }
}

impl std::fmt::Display for ArtifactPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}*.{}",
            self.dir.display(),
            self.prefix,
            self.extension
        )
    }
}

/// The theme under development and how to reach it from the console.
#[derive(Debug, Clone)]
pub struct DeploymentTarget {
    pub bundle: BundleName,
    pub theme_path: PathBuf,
    pub web_bundle_dir: String,
    pub artifacts: ArtifactPattern,
    pub platform: PlatformFamily,
}

impl DeploymentTarget {
    /// Target with the default layout: `.web_bundle_dir` and `dist/<bundle>*.war`.
    pub fn new(bundle: BundleName, theme_path: impl Into<PathBuf>) -> Self {
        let theme_path = theme_path.into();
        let artifacts = ArtifactPattern::new(theme_path.join("dist"), bundle.as_str(), "war");
        Self {
            bundle,
            theme_path,
            web_bundle_dir: DEFAULT_WEB_BUNDLE_DIR.to_string(),
            artifacts,
            platform: PlatformFamily::host(),
        }
    }

    pub fn web_bundle_dir(mut self, dir: impl Into<String>) -> Self {
        self.web_bundle_dir = dir.into();
        self
    }

    pub fn artifacts(mut self, artifacts: ArtifactPattern) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub fn platform(mut self, platform: PlatformFamily) -> Self {
        self.platform = platform;
        self
    }

    pub fn theme_path(&self) -> &Path {
        &self.theme_path
    }

    pub fn context_path(&self) -> String {
        context_path(&self.bundle)
    }

    /// URI passed to `install`.
    pub fn install_uri(&self) -> String {
        web_bundle_dir_uri(
            &self.theme_path,
            &self.web_bundle_dir,
            &self.bundle,
            self.platform,
        )
    }
}
