// ABOUTME: Console command construction.
// ABOUTME: Commands are token lists joined by single spaces.

use std::fmt;

use crate::types::{BundleId, BundleName};

/// Bundle management verbs understood by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// `lb`: list bundles.
    List,
    Stop,
    Start,
    Install,
    Uninstall,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::List => "lb",
            Verb::Stop => "stop",
            Verb::Start => "start",
            Verb::Install => "install",
            Verb::Uninstall => "uninstall",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "lb" => Some(Verb::List),
            "stop" => Some(Verb::Stop),
            "start" => Some(Verb::Start),
            "install" => Some(Verb::Install),
            "uninstall" => Some(Verb::Uninstall),
            _ => None,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single console command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: Verb,
    args: Vec<String>,
}

/// `grep` pattern selecting listing rows deployed from this bundle, whether
/// packaged (`webbundle:`) or exploded (`webbundledir:`).
pub fn bundle_filter(bundle: &BundleName) -> String {
    format!("webbundle(dir|):file.*{bundle}")
}

impl Command {
    pub fn new(verb: Verb, args: Vec<String>) -> Self {
        Self { verb, args }
    }

    /// `lb -u | grep '<pattern>'`: bundle table with update locations,
    /// narrowed to rows matching `pattern`.
    pub fn list(pattern: &str) -> Self {
        Self::new(
            Verb::List,
            vec![
                "-u".to_string(),
                "|".to_string(),
                "grep".to_string(),
                format!("'{pattern}'"),
            ],
        )
    }

    pub fn stop(id: &BundleId) -> Self {
        Self::new(Verb::Stop, vec![id.to_string()])
    }

    pub fn start(id: &BundleId) -> Self {
        Self::new(Verb::Start, vec![id.to_string()])
    }

    pub fn install(uri: &str) -> Self {
        Self::new(Verb::Install, vec![uri.to_string()])
    }

    pub fn uninstall(id: &BundleId) -> Self {
        Self::new(Verb::Uninstall, vec![id.to_string()])
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// All tokens, verb first.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.verb.as_str()).chain(self.args.iter().map(String::as_str))
    }

    /// Tokens joined by single spaces, without the line delimiter.
    pub fn to_line(&self) -> String {
        self.tokens().collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
