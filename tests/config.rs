// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, console shorthand, destination merging, and target resolution.

use std::path::PathBuf;
use std::time::Duration;
use webbundle::config::*;
use webbundle::error::Error;
use webbundle::locator::PlatformFamily;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config = Config::from_yaml("bundle: acme\n").unwrap();
        assert_eq!(config.bundle.as_str(), "acme");
        assert_eq!(config.console.host, "localhost");
        assert_eq!(config.console.port, 11311);
        assert_eq!(config.web_bundle_dir, ".web_bundle_dir");
        assert_eq!(config.artifacts.dir, PathBuf::from("dist"));
        assert_eq!(config.artifacts.extension, "war");
        assert_eq!(config.poll.interval, Duration::from_secs(1));
        assert_eq!(config.poll.max_attempts, 120);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.command_timeout, Duration::from_secs(30));
        assert_eq!(config.platform, PlatformSetting::Auto);
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
bundle: acme-theme
theme_path: themes/acme
console:
  host: portal.local
  port: 12000
web_bundle_dir: build/bundle
artifacts:
  dir: /opt/portal/deploy
  extension: .jar
poll:
  interval: 250ms
  max_attempts: 0
connect_timeout: 3s
command_timeout: 1m
platform: windows
destinations:
  staging:
    console: staging.local
    command_timeout: 2m
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.theme_path, Some(PathBuf::from("themes/acme")));
        assert_eq!(config.console.host, "portal.local");
        assert_eq!(config.console.port, 12000);
        assert_eq!(config.web_bundle_dir, "build/bundle");
        assert_eq!(config.artifacts.extension, ".jar");
        assert_eq!(config.poll.interval, Duration::from_millis(250));
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.command_timeout, Duration::from_secs(60));
        assert_eq!(config.platform, PlatformSetting::Windows);
        assert!(config.destinations.contains_key("staging"));
    }

    #[test]
    fn console_shorthand_with_port() {
        let config = Config::from_yaml("bundle: acme\nconsole: 10.0.0.5:11312\n").unwrap();
        assert_eq!(config.console.host, "10.0.0.5");
        assert_eq!(config.console.port, 11312);
    }

    #[test]
    fn invalid_bundle_name_is_rejected() {
        assert!(Config::from_yaml("bundle: \"../etc\"\n").is_err());
        assert!(Config::from_yaml("bundle: \"a b\"\n").is_err());
    }

    #[test]
    fn missing_bundle_is_rejected() {
        assert!(Config::from_yaml("console: localhost\n").is_err());
    }
}

mod poll {
    use super::*;

    #[test]
    fn zero_attempts_means_unbounded() {
        let config = Config::from_yaml("bundle: acme\npoll:\n  max_attempts: 0\n").unwrap();
        assert_eq!(config.poll.policy().max_attempts, None);
    }

    #[test]
    fn default_policy_is_bounded() {
        let config = Config::from_yaml("bundle: acme\n").unwrap();
        let policy = config.poll.policy();
        assert_eq!(policy.max_attempts, Some(120));
        assert_eq!(policy.interval, Duration::from_secs(1));
    }
}

mod destinations {
    use super::*;

    const YAML: &str = r#"
bundle: acme
console: localhost
command_timeout: 30s
destinations:
  staging:
    console:
      host: staging.local
      port: 11400
  slow:
    command_timeout: 5m
"#;

    #[test]
    fn destination_overrides_console() {
        let config = Config::from_yaml(YAML).unwrap();
        let staging = config.for_destination("staging").unwrap();
        assert_eq!(staging.console.host, "staging.local");
        assert_eq!(staging.console.port, 11400);
        assert_eq!(staging.command_timeout, Duration::from_secs(30));
    }

    #[test]
    fn destination_keeps_console_when_not_set() {
        let config = Config::from_yaml(YAML).unwrap();
        let slow = config.for_destination("slow").unwrap();
        assert_eq!(slow.console.host, "localhost");
        assert_eq!(slow.command_timeout, Duration::from_secs(300));
    }

    #[test]
    fn unknown_destination_is_an_error() {
        let config = Config::from_yaml(YAML).unwrap();
        let err = config.for_destination("production").unwrap_err();
        assert!(matches!(err, Error::UnknownDestination(name) if name == "production"));
    }
}

mod target {
    use super::*;

    #[test]
    fn target_resolves_relative_paths_against_project_dir() {
        let mut config = Config::from_yaml(
            "bundle: acme\ntheme_path: themes/acme\nplatform: posix\n",
        )
        .unwrap();
        config.project_dir = Some(PathBuf::from("/work"));

        let target = config.target().unwrap();
        assert_eq!(target.theme_path(), PathBuf::from("/work/themes/acme"));
        assert_eq!(target.artifacts.dir, PathBuf::from("/work/themes/acme/dist"));
        assert_eq!(target.artifacts.prefix, "acme");
        assert_eq!(target.platform, PlatformFamily::Posix);
        assert_eq!(
            target.install_uri(),
            "webbundledir:file:///work/themes/acme/.web_bundle_dir?Web-ContextPath=/acme"
        );
    }

    #[test]
    fn absolute_artifacts_dir_is_kept() {
        let mut config = Config::from_yaml(
            "bundle: acme\nartifacts:\n  dir: /opt/deploy\n  extension: .war\n",
        )
        .unwrap();
        config.project_dir = Some(PathBuf::from("/work"));

        let target = config.target().unwrap();
        assert_eq!(target.artifacts.dir, PathBuf::from("/opt/deploy"));
        assert_eq!(target.artifacts.extension, "war");
    }

    #[test]
    fn theme_path_without_project_dir_is_absolute() {
        let config = Config::from_yaml("bundle: acme\nplatform: posix\n").unwrap();
        let cwd = std::env::current_dir().unwrap();

        let target = config.target().unwrap();
        assert!(target.theme_path().is_absolute());
        assert_eq!(target.theme_path(), std::path::absolute(&cwd).unwrap());

        let uri = target.install_uri();
        assert!(!uri.contains("/./"), "{uri}");
        assert!(uri.starts_with("webbundledir:file:///"), "{uri}");
    }

    #[test]
    fn relative_theme_path_without_project_dir_resolves_from_cwd() {
        let config = Config::from_yaml("bundle: acme\ntheme_path: themes/acme\n").unwrap();
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(
            config.resolved_theme_path().unwrap(),
            std::path::absolute(cwd.join("themes/acme")).unwrap()
        );
    }

    #[test]
    fn connection_config_carries_timeouts() {
        let config = Config::from_yaml(
            "bundle: acme\nconsole: portal:12001\nconnect_timeout: 2s\ncommand_timeout: 7s\n",
        )
        .unwrap();
        let connection = config.connection_config();
        assert_eq!(connection.address(), "portal:12001");
        assert_eq!(connection.connect_timeout, Duration::from_secs(2));
        assert_eq!(connection.command_timeout, Duration::from_secs(7));
        assert_eq!(connection.prompt, "g! ");
    }
}

mod discovery {
    use super::*;
    use std::fs;

    #[test]
    fn discovers_alternate_file_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_ALT), "bundle: acme\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.bundle.as_str(), "acme");
        assert_eq!(config.project_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn discovers_config_in_dot_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".webbundle")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), "bundle: acme\n").unwrap();

        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("acme"), false).unwrap();

        let err = init_config(dir.path(), Some("other"), false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        init_config(dir.path(), Some("other"), true).unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.bundle.as_str(), "other");
    }

    #[test]
    fn init_rejects_invalid_bundle_name() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_config(dir.path(), Some("bad name"), false).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
