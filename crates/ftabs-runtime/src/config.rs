#![forbid(unsafe_code)]

//! Host configuration.
//!
//! ```toml
//! editable = true
//! max_drain_rounds = 16
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

#[cfg(feature = "config-file")]
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default bound on deferred-task drain rounds per `run_pending` call.
pub const DEFAULT_MAX_DRAIN_ROUNDS: usize = 16;

/// Editor host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Whether views render editing affordances (menus, create buttons).
    pub editable: bool,

    /// Maximum drain rounds per `run_pending` call. A repair that keeps
    /// scheduling more work is cut off here with a warning.
    pub max_drain_rounds: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            editable: true,
            max_drain_rounds: DEFAULT_MAX_DRAIN_ROUNDS,
        }
    }
}

impl HostConfig {
    /// A read-only host configuration.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            editable: false,
            ..Self::default()
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Validate parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_drain_rounds == 0 {
            errors.push("host.max_drain_rounds must be at least 1".to_owned());
        }
        errors
    }

    /// Return `self` if valid, otherwise the validation errors.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = HostConfig::default();
        assert!(config.editable);
        assert_eq!(config.max_drain_rounds, DEFAULT_MAX_DRAIN_ROUNDS);
        assert!(config.validate().is_empty());
        assert!(!HostConfig::read_only().editable);
    }

    #[test]
    fn zero_rounds_rejected() {
        let config = HostConfig {
            max_drain_rounds: 0,
            ..HostConfig::default()
        };
        assert_eq!(config.validate().len(), 1);
        let err = config.validated().expect_err("invalid");
        assert!(err.to_string().contains("max_drain_rounds"));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn partial_toml_fills_defaults() {
        let config = HostConfig::from_toml_str("editable = false").expect("parse");
        assert!(!config.editable);
        assert_eq!(config.max_drain_rounds, DEFAULT_MAX_DRAIN_ROUNDS);
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn json_and_file_loading() {
        let config = HostConfig::from_json_str(r#"{"max_drain_rounds": 4}"#).expect("parse");
        assert_eq!(config.max_drain_rounds, 4);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("host.toml");
        std::fs::write(&path, "max_drain_rounds = 2\n").expect("write");
        let config = HostConfig::from_toml_file(&path).expect("load");
        assert_eq!(config.max_drain_rounds, 2);

        let missing = HostConfig::from_toml_file(dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn malformed_toml_is_reported() {
        let err = HostConfig::from_toml_str("editable = [").expect_err("malformed");
        assert!(err.to_string().starts_with("TOML parse error"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
