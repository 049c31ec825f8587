//! Injected store and logging configuration.
//!
//! # Responsibility
//! - Load YAML configuration and expand `${VAR}` / `${VAR:-default}`
//!   placeholders from the process environment.
//! - Validate values before any connection is opened.
//!
//! # Invariants
//! - No connection details live in globals; callers pass `CatalogConfig`
//!   (or its `DatabaseConfig`) into `db::open_configured`.

use crate::logging::default_log_level;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Store file used when configuration does not name one.
pub const DEFAULT_DATABASE_PATH: &str = "catalog.db";

static ENV_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("valid env var regex")
});

/// Configuration load/validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config file: {err}"),
            Self::Parse(err) => write!(f, "failed to parse YAML config: {err}"),
            Self::Validation(message) => write!(f, "config validation error: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Parse(value)
    }
}

/// Where the relational store lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATABASE_PATH.to_string(),
        }
    }
}

/// Logger settings consumed by `logging::init_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files. Stderr only when unset.
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl CatalogConfig {
    /// Loads and validates configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parses and validates configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config = Self::parse_yaml_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML file without validating it.
    ///
    /// For callers that apply overrides first and then call `validate()`.
    pub fn load_unvalidated(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse_yaml_str(&content)
    }

    fn parse_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(content);
        Ok(serde_yaml::from_str(&expanded)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database.path must not be empty".to_string(),
            ));
        }

        if let Some(dir) = self.logging.dir.as_deref() {
            if !Path::new(dir.trim()).is_absolute() {
                return Err(ConfigError::Validation(format!(
                    "logging.dir must be an absolute path, got `{dir}`"
                )));
            }
        }

        Ok(())
    }
}

/// Expands `${VAR}` and `${VAR:-default}` from the environment.
///
/// Unset variables without a default expand to an empty string.
///
/// Substitution is textual and runs before YAML parsing, so a value is not
/// escaped: one containing `"` inside a double-quoted scalar yields invalid
/// YAML and `ConfigError::Parse`.
pub fn expand_env_vars(input: &str) -> String {
    ENV_VAR_RE
        .replace_all(input, |caps: &Captures<'_>| {
            let default_value = caps.get(2).map_or("", |m| m.as_str());
            std::env::var(&caps[1]).unwrap_or_else(|_| default_value.to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::{expand_env_vars, CatalogConfig, ConfigError, DEFAULT_DATABASE_PATH};

    #[test]
    fn empty_document_uses_defaults() {
        let config = CatalogConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.database.path, DEFAULT_DATABASE_PATH);
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn database_path_can_come_from_environment() {
        std::env::set_var("CATALOG_CONFIG_TEST_DB", "/tmp/from-env.db");
        let config =
            CatalogConfig::from_yaml_str("database:\n  path: \"${CATALOG_CONFIG_TEST_DB}\"\n")
                .unwrap();
        assert_eq!(config.database.path, "/tmp/from-env.db");
    }

    #[test]
    fn default_applies_when_variable_is_unset() {
        let expanded = expand_env_vars("${CATALOG_CONFIG_TEST_UNSET_VAR:-fallback.db}");
        assert_eq!(expanded, "fallback.db");
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = CatalogConfig::from_yaml_str("logging:\n  dir: logs\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(message) if message.contains("absolute")));
    }

    #[test]
    fn empty_database_path_is_rejected() {
        let err = CatalogConfig::from_yaml_str("database:\n  path: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn quote_in_substituted_value_breaks_double_quoted_scalar() {
        std::env::set_var("CATALOG_CONFIG_TEST_QUOTED", "a\"b.db");
        let err = CatalogConfig::from_yaml_str(
            "database:\n  path: \"${CATALOG_CONFIG_TEST_QUOTED}\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = CatalogConfig::from_yaml_str("database: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
