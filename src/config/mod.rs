// ABOUTME: Configuration types and parsing for webbundle.yml.
// ABOUTME: Handles YAML parsing, path resolution, and destination merging.

mod console;
mod deserialize;
mod init;

pub use console::ConsoleConfig;
pub use init::init_config;

use crate::console::ConnectionConfig;
use crate::deploy::{ArtifactPattern, DEFAULT_WEB_BUNDLE_DIR, DeploymentTarget, PollPolicy};
use crate::error::{Error, Result};
use crate::locator::PlatformFamily;
use crate::types::BundleName;
use deserialize::{deserialize_console, deserialize_console_option};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "webbundle.yml";
pub const CONFIG_FILENAME_ALT: &str = "webbundle.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".webbundle/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bundle: BundleName,

    /// Theme root. Relative paths resolve against the project directory.
    #[serde(default)]
    pub theme_path: Option<PathBuf>,

    #[serde(default, deserialize_with = "deserialize_console")]
    pub console: ConsoleConfig,

    #[serde(default = "default_web_bundle_dir")]
    pub web_bundle_dir: String,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,

    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,

    #[serde(default)]
    pub platform: PlatformSetting,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,

    /// Directory the config was discovered in.
    #[serde(skip)]
    pub project_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Destination {
    #[serde(default, deserialize_with = "deserialize_console_option")]
    pub console: Option<ConsoleConfig>,

    #[serde(default, with = "humantime_serde")]
    pub command_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_artifacts_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_artifacts_extension")]
    pub extension: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
            extension: default_artifacts_extension(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub interval: Duration,
    /// 0 means no limit.
    #[serde(default = "default_poll_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            max_attempts: default_poll_max_attempts(),
        }
    }
}

impl PollConfig {
    pub fn policy(&self) -> PollPolicy {
        let max_attempts = (self.max_attempts > 0).then_some(self.max_attempts);
        PollPolicy::new(self.interval, max_attempts)
    }
}

/// Path style used when building the install URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSetting {
    /// Whatever this machine uses.
    #[default]
    Auto,
    Posix,
    Windows,
}

impl PlatformSetting {
    pub fn resolve(self) -> PlatformFamily {
        match self {
            PlatformSetting::Auto => PlatformFamily::host(),
            PlatformSetting::Posix => PlatformFamily::Posix,
            PlatformSetting::Windows => PlatformFamily::Windows,
        }
    }
}

fn default_web_bundle_dir() -> String {
    DEFAULT_WEB_BUNDLE_DIR.to_string()
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_artifacts_extension() -> String {
    "war".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_poll_max_attempts() -> u32 {
    120
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                let mut config = Self::load(path)?;
                config.project_dir = Some(dir.to_path_buf());
                return Ok(config);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn for_destination(&self, name: &str) -> Result<Config> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref console) = dest.console {
            merged.console = console.clone();
        }

        if let Some(timeout) = dest.command_timeout {
            merged.command_timeout = timeout;
        }

        Ok(merged)
    }

    /// Absolute theme root. Relative paths resolve against the project
    /// directory, or the working directory for a config loaded directly.
    pub fn resolved_theme_path(&self) -> Result<PathBuf> {
        let base = self
            .project_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let path = match &self.theme_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base.join(path),
            None => base,
        };
        // The install URI must carry an absolute path.
        Ok(std::path::absolute(path)?)
    }

    /// Deployment target described by this config.
    pub fn target(&self) -> Result<DeploymentTarget> {
        let theme_path = self.resolved_theme_path()?;
        let artifacts_dir = if self.artifacts.dir.is_absolute() {
            self.artifacts.dir.clone()
        } else {
            theme_path.join(&self.artifacts.dir)
        };

        Ok(DeploymentTarget::new(self.bundle.clone(), theme_path)
            .web_bundle_dir(self.web_bundle_dir.clone())
            .artifacts(ArtifactPattern::new(
                artifacts_dir,
                self.bundle.as_str(),
                &self.artifacts.extension,
            ))
            .platform(self.platform.resolve()))
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig::new(self.console.host.clone())
            .port(self.console.port)
            .connect_timeout(self.connect_timeout)
            .command_timeout(self.command_timeout)
    }

    /// Defaults for a fresh project deploying `bundle`.
    pub fn template(bundle: BundleName) -> Self {
        Config {
            bundle,
            theme_path: None,
            console: ConsoleConfig::default(),
            web_bundle_dir: default_web_bundle_dir(),
            artifacts: ArtifactsConfig::default(),
            poll: PollConfig::default(),
            connect_timeout: default_connect_timeout(),
            command_timeout: default_command_timeout(),
            platform: PlatformSetting::default(),
            destinations: HashMap::new(),
            project_dir: None,
        }
    }
}
