//! Log-level handling.
//!
//! The logger itself is whatever the host installs behind the `log` facade;
//! this module only carries the configured verbosity and maps it onto the
//! facade's level filter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Log verbosity accepted by `initialize`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including message dumps and callback bookkeeping
    Debug,
    /// Normal operational messages
    #[default]
    Info,
    /// Recoverable problems (decode failures, origin mismatches)
    Warn,
    /// Unrecoverable problems within a single operation
    Error,
}

impl LogLevel {
    /// Parse a level name; unknown names yield `None`
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// The equivalent `log` facade filter
    #[must_use]
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Debug => log::LevelFilter::Debug,
            Self::Info => log::LevelFilter::Info,
            Self::Warn => log::LevelFilter::Warn,
            Self::Error => log::LevelFilter::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels_case_insensitively() {
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("WARN"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("verbose"), None);
    }

    #[test]
    fn default_is_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert_eq!(LogLevel::Info.to_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_value(LogLevel::Error).unwrap(), "error");
        let level: LogLevel = serde_json::from_value(serde_json::json!("debug")).unwrap();
        assert_eq!(level, LogLevel::Debug);
    }
}
