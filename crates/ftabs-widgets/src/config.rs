#![forbid(unsafe_code)]

//! Tab group configuration.
//!
//! ```toml
//! id_prefix = "tab"
//! group_prefix = "tabs"
//! default_title = "New tab"
//! reseed_after_delete = true
//! max_title_width = 24
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;

use ftabs_runtime::ConfigError;
use serde::{Deserialize, Serialize};

/// Tab group behavior and naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Prefix of derived selector identifiers (`<prefix>_0_2`).
    pub id_prefix: String,

    /// Prefix of per-container radio group keys (`<prefix>_0`).
    pub group_prefix: String,

    /// Title of freshly created tabs.
    pub default_title: String,

    /// Re-activate the first remaining tab when the active one is deleted.
    pub reseed_after_delete: bool,

    /// Display width of a label's title before it is truncated with `…`.
    pub max_title_width: usize,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            id_prefix: "tab".to_owned(),
            group_prefix: "tabs".to_owned(),
            default_title: "New tab".to_owned(),
            reseed_after_delete: true,
            max_title_width: 24,
        }
    }
}

fn is_identifier_safe(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl TabsConfig {
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
        if !is_identifier_safe(&self.id_prefix) {
            errors.push(format!(
                "tabs.id_prefix must be non-empty [A-Za-z0-9_-], got {:?}",
                self.id_prefix
            ));
        }
        if !is_identifier_safe(&self.group_prefix) {
            errors.push(format!(
                "tabs.group_prefix must be non-empty [A-Za-z0-9_-], got {:?}",
                self.group_prefix
            ));
        }
        if self.id_prefix == self.group_prefix {
            errors.push("tabs.id_prefix and tabs.group_prefix must differ".to_owned());
        }
        if self.max_title_width == 0 {
            errors.push("tabs.max_title_width must be at least 1".to_owned());
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
