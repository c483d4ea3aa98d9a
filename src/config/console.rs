// ABOUTME: Console address configuration.
// ABOUTME: Parses formats like "host", "host:port", and the detailed mapping form.

use serde::Deserialize;

use crate::console::DEFAULT_PORT;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ConsoleConfig {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("console address cannot be empty".to_string());
        }

        // Parse format: host[:port]
        let (host, port) = if let Some(colon_pos) = s.rfind(':') {
            let port_str = &s[colon_pos + 1..];
            let port = port_str
                .parse::<u16>()
                .map_err(|_| format!("invalid port: {}", port_str))?;
            (&s[..colon_pos], port)
        } else {
            (s, DEFAULT_PORT)
        };

        if host.is_empty() {
            return Err("hostname cannot be empty".to_string());
        }

        Ok(ConsoleConfig {
            host: host.to_string(),
            port,
        })
    }
}

impl std::fmt::Display for ConsoleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_host_only_uses_default_port() {
        let console = ConsoleConfig::parse("portal.local").unwrap();
        assert_eq!(console.host, "portal.local");
        assert_eq!(console.port, 11311);
    }

    #[test]
    fn parse_host_and_port() {
        let console = ConsoleConfig::parse("127.0.0.1:12000").unwrap();
        assert_eq!(console.host, "127.0.0.1");
        assert_eq!(console.port, 12000);
    }

    #[test]
    fn parse_rejects_bad_port() {
        assert!(ConsoleConfig::parse("host:abc").unwrap_err().contains("invalid port"));
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(ConsoleConfig::parse("").is_err());
        assert!(ConsoleConfig::parse(":11311").is_err());
    }
}
