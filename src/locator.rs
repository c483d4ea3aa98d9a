// ABOUTME: Builds the URIs the console uses to locate a web bundle directory.
// ABOUTME: Pure functions; the platform family is passed in rather than sniffed.

use std::fmt;
use std::path::Path;

use crate::types::BundleName;

/// URI scheme for deploying an exploded web bundle directory.
pub const WEB_BUNDLE_DIR_SCHEME: &str = "webbundledir";

/// Path flavour of the machine that owns the theme directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    /// Rooted at `/`.
    Posix,
    /// Rooted at a drive letter, e.g. `c:\`.
    Windows,
}

impl PlatformFamily {
    /// Family of the host this process runs on.
    pub fn host() -> Self {
        if cfg!(windows) {
            PlatformFamily::Windows
        } else {
            PlatformFamily::Posix
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFamily::Posix => write!(f, "posix"),
            PlatformFamily::Windows => write!(f, "windows"),
        }
    }
}

/// Context path a bundle is served under.
pub fn context_path(bundle: &BundleName) -> String {
    format!("/{bundle}")
}

/// Format the `webbundledir:` URI for `<theme_path>/<rel_bundle_dir>`.
///
/// `theme_path` must be absolute; callers resolve it before getting here.
///
/// POSIX paths become `webbundledir:file:///abs/path?...`, drive-letter paths
/// become `webbundledir:file:/c:/abs/path?...`. The console resolves the
/// string verbatim, so no percent-encoding is applied.
pub fn web_bundle_dir_uri(
    theme_path: &Path,
    rel_bundle_dir: &str,
    bundle: &BundleName,
    platform: PlatformFamily,
) -> String {
    let theme = theme_path.to_string_lossy();
    let theme = match platform {
        PlatformFamily::Posix => theme.into_owned(),
        PlatformFamily::Windows => theme.replace('\\', "/"),
    };

    let rel = rel_bundle_dir.replace('\\', "/");
    let rel = rel.trim_matches('/');
    let mut folder = theme.trim_end_matches('/').to_string();
    if !rel.is_empty() {
        folder.push('/');
        folder.push_str(rel);
    }

    let separator = match platform {
        PlatformFamily::Posix => "/",
        PlatformFamily::Windows => "",
    };

    format!(
        "{WEB_BUNDLE_DIR_SCHEME}:file:/{separator}{folder}?Web-ContextPath={}",
        context_path(bundle)
    )
}
