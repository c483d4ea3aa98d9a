// ABOUTME: Config scaffolding for theme projects.
// ABOUTME: Creates webbundle.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::BundleName;

use super::{CONFIG_FILENAME, Config};

/// Bundle name used when neither the caller nor the directory provides one.
const DEFAULT_BUNDLE: &str = "my-theme";

pub fn init_config(dir: &Path, bundle: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let bundle = match bundle {
        Some(b) => b.to_string(),
        None => dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| BundleName::new(name).is_ok())
            .unwrap_or_else(|| DEFAULT_BUNDLE.to_string()),
    };
    let bundle = BundleName::new(&bundle).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    let config = Config::template(bundle);

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"bundle: {}
console: {}
web_bundle_dir: {}
artifacts:
  dir: {}
  extension: {}
poll:
  interval: 1s
  # 0 waits until the console drops the bundle, however long that takes
  max_attempts: {}
# platform: auto   # or posix / windows, for the path style of theme_path
"#,
        config.bundle,
        config.console,
        config.web_bundle_dir,
        config.artifacts.dir.display(),
        config.artifacts.extension,
        config.poll.max_attempts,
    )
}
