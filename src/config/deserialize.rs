// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Accepts the console address as a string or as a mapping.

use serde::Deserialize;

use super::ConsoleConfig;

pub fn deserialize_console<'de, D>(deserializer: D) -> Result<ConsoleConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    ConsoleEntry::deserialize(deserializer)?
        .into_console_config()
        .map_err(serde::de::Error::custom)
}

pub fn deserialize_console_option<'de, D>(
    deserializer: D,
) -> Result<Option<ConsoleConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<ConsoleEntry> = Option::deserialize(deserializer)?;
    opt.map(ConsoleEntry::into_console_config)
        .transpose()
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConsoleEntry {
    Simple(String),
    Detailed(ConsoleConfig),
}

impl ConsoleEntry {
    fn into_console_config(self) -> Result<ConsoleConfig, String> {
        match self {
            ConsoleEntry::Simple(s) => ConsoleConfig::parse(&s),
            ConsoleEntry::Detailed(c) => Ok(c),
        }
    }
}
