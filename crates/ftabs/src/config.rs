#![forbid(unsafe_code)]

//! Combined configuration file.
//!
//! ```toml
//! [host]
//! editable = true
//! max_drain_rounds = 16
//!
//! [tabs]
//! id_prefix = "tab"
//! group_prefix = "tabs"
//! default_title = "New tab"
//! reseed_after_delete = true
//! max_title_width = 24
//! ```
//!
//! Both sections and every field are optional.

#[cfg(feature = "config-file")]
use std::path::Path;

use ftabs_runtime::{ConfigError, HostConfig};
use ftabs_widgets::TabsConfig;
use serde::{Deserialize, Serialize};

/// Host and tab settings loaded together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: HostConfig,
    pub tabs: TabsConfig,
}

impl Config {
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

    /// Validate both sections. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.host.validate();
        errors.extend(self.tabs.validate());
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
