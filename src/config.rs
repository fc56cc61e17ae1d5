//! Configuration management for tlog2ninja
//!
//! Settings are read once from environment variables at startup, validated,
//! and then passed explicitly to the stages that need them. Command-line
//! flags override individual values.
//!
//! # Environment Variables
//!
//! - `TLOG2NINJA_PATTERN`: file name glob for invocation logs - default: "CL.command*.tlog"
//! - `TLOG2NINJA_TOOL`: tool placed first on every generated command line - default: "indexer"
//! - `TLOG2NINJA_ENCODING`: log encoding (utf-16le|utf-8) - default: "utf-16le"
//! - `TLOG2NINJA_DUPLICATES`: duplicate source policy (keep-all|last-wins|reject) - default: "last-wins"
//! - `TLOG2NINJA_LOG_LEVEL`: logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use tlog2ninja::Tlog2NinjaConfig;
//!
//! let config = Tlog2NinjaConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::harvest::LogEncoding;
use crate::parse::DuplicatePolicy;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_PATTERN: &str = "CL.command*.tlog";
pub const DEFAULT_TOOL: &str = "indexer";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log encoding: {0}. Valid options: utf-16le, utf-8")]
    InvalidEncoding(String),

    #[error("Invalid duplicate policy: {0}. Valid options: keep-all, last-wins, reject")]
    InvalidDuplicatePolicy(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

#[derive(Debug, Clone)]
pub struct Tlog2NinjaConfig {
    pub pattern: String,
    pub tool: String,
    pub encoding: LogEncoding,
    pub duplicates: DuplicatePolicy,
    pub log_level: String,
}

impl Default for Tlog2NinjaConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self::builtin())
    }
}

impl Tlog2NinjaConfig {
    /// Built-in defaults, ignoring the environment.
    pub fn builtin() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            tool: DEFAULT_TOOL.to_string(),
            encoding: LogEncoding::default(),
            duplicates: DuplicatePolicy::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Reads `TLOG2NINJA_*` variables, falling back to built-in defaults for
    /// unset ones. Unparseable enum values are reported instead of ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let builtin = Self::builtin();

        let pattern = env::var("TLOG2NINJA_PATTERN").unwrap_or(builtin.pattern);
        let tool = env::var("TLOG2NINJA_TOOL").unwrap_or(builtin.tool);

        let encoding = match env::var("TLOG2NINJA_ENCODING") {
            Ok(value) => value
                .parse::<LogEncoding>()
                .map_err(|_| ConfigError::InvalidEncoding(value))?,
            Err(_) => builtin.encoding,
        };

        let duplicates = match env::var("TLOG2NINJA_DUPLICATES") {
            Ok(value) => value
                .parse::<DuplicatePolicy>()
                .map_err(|_| ConfigError::InvalidDuplicatePolicy(value))?,
            Err(_) => builtin.duplicates,
        };

        let log_level = env::var("TLOG2NINJA_LOG_LEVEL")
            .unwrap_or(builtin.log_level)
            .to_lowercase();

        Ok(Self {
            pattern,
            tool,
            encoding,
            duplicates,
            log_level,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "File pattern must not be empty".to_string(),
            ));
        }
        if let Err(e) = glob::Pattern::new(&self.pattern) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid file pattern '{}': {}",
                self.pattern, e
            )));
        }

        if self.tool.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Tool path must not be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("pattern".to_string(), self.pattern.clone());
        map.insert("tool".to_string(), self.tool.clone());
        map.insert("encoding".to_string(), self.encoding.to_string());
        map.insert("duplicates".to_string(), self.duplicates.to_string());
        map.insert("log_level".to_string(), self.log_level.clone());
        map
    }
}

impl fmt::Display for Tlog2NinjaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tlog2ninja Configuration:")?;
        writeln!(f, "  Pattern: {}", self.pattern)?;
        writeln!(f, "  Tool: {}", self.tool)?;
        writeln!(f, "  Encoding: {}", self.encoding)?;
        writeln!(f, "  Duplicates: {}", self.duplicates)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = [
            EnvGuard::unset("TLOG2NINJA_PATTERN"),
            EnvGuard::unset("TLOG2NINJA_TOOL"),
            EnvGuard::unset("TLOG2NINJA_ENCODING"),
            EnvGuard::unset("TLOG2NINJA_DUPLICATES"),
            EnvGuard::unset("TLOG2NINJA_LOG_LEVEL"),
        ];

        let config = Tlog2NinjaConfig::default();

        assert_eq!(config.pattern, DEFAULT_PATTERN);
        assert_eq!(config.tool, DEFAULT_TOOL);
        assert_eq!(config.encoding, LogEncoding::Utf16Le);
        assert_eq!(config.duplicates, DuplicatePolicy::LastWins);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = [
            EnvGuard::set("TLOG2NINJA_PATTERN", "*.tlog"),
            EnvGuard::set("TLOG2NINJA_TOOL", "/opt/bin/idx"),
            EnvGuard::set("TLOG2NINJA_ENCODING", "utf-8"),
            EnvGuard::set("TLOG2NINJA_DUPLICATES", "reject"),
            EnvGuard::set("TLOG2NINJA_LOG_LEVEL", "DEBUG"),
        ];

        let config = Tlog2NinjaConfig::from_env().unwrap();

        assert_eq!(config.pattern, "*.tlog");
        assert_eq!(config.tool, "/opt/bin/idx");
        assert_eq!(config.encoding, LogEncoding::Utf8);
        assert_eq!(config.duplicates, DuplicatePolicy::Reject);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_invalid_encoding_is_reported() {
        let _guard = EnvGuard::set("TLOG2NINJA_ENCODING", "latin1");

        let result = Tlog2NinjaConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidEncoding(v)) if v == "latin1"));
    }

    #[test]
    fn test_configuration_validation_invalid_log_level() {
        let config = Tlog2NinjaConfig {
            log_level: "invalid".to_string(),
            ..Tlog2NinjaConfig::builtin()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_invalid_pattern() {
        let config = Tlog2NinjaConfig {
            pattern: "CL.[command".to_string(),
            ..Tlog2NinjaConfig::builtin()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_configuration_validation_empty_tool() {
        let config = Tlog2NinjaConfig {
            tool: "  ".to_string(),
            ..Tlog2NinjaConfig::builtin()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_lists_every_setting() {
        let config = Tlog2NinjaConfig::builtin();
        let display = config.to_string();

        assert!(display.contains("Pattern: CL.command*.tlog"));
        assert!(display.contains("Encoding: utf-16le"));
        assert!(display.contains("Duplicates: last-wins"));
        assert_eq!(config.to_display_map().len(), 5);
    }
}
