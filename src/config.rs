//! Configuration loaded from YAML.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```yaml
//! storage_key: theme
//! default_mode: light
//! dark_class: dark-mode
//! toggle_control_id: theme-toggle
//! dark_hours: { start: 18, end: 6 }
//! auth_callback_path: /auth/callback
//! tooltip_attribute: data-bs-toggle=tooltip
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::{DEFAULT_DARK_CLASS, DEFAULT_TOGGLE_CONTROL_ID};
use crate::error::ThemeError;
use crate::mode::ThemeMode;
use crate::schedule::DarkHours;

/// Storage key the preference is persisted under by default.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Key of the preference in the persistent store.
    pub storage_key: String,
    /// Mode used when the store holds no (or an unreadable) value.
    pub default_mode: ThemeMode,
    /// Class toggled on the root element for dark.
    pub dark_class: String,
    /// Element id of the toggle control.
    pub toggle_control_id: String,
    /// Hours during which system mode starts out dark.
    pub dark_hours: DarkHours,
    /// Path the sign-in flow navigates to with the identity token.
    pub auth_callback_path: String,
    /// `name=value` attribute marking elements that get a tooltip.
    pub tooltip_attribute: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_mode: ThemeMode::Light,
            dark_class: DEFAULT_DARK_CLASS.to_string(),
            toggle_control_id: DEFAULT_TOGGLE_CONTROL_ID.to_string(),
            dark_hours: DarkHours::default(),
            auth_callback_path: "/auth/callback".to_string(),
            tooltip_attribute: "data-bs-toggle=tooltip".to_string(),
        }
    }
}

impl ThemeConfig {
    /// Parses and validates a YAML config.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ThemeError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ThemeError::Storage {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.storage_key.trim().is_empty() {
            return Err(ThemeError::InvalidConfig("storage_key is empty".into()));
        }
        if self.dark_class.trim().is_empty() {
            return Err(ThemeError::InvalidConfig("dark_class is empty".into()));
        }
        if !self.auth_callback_path.starts_with('/') {
            return Err(ThemeError::InvalidConfig(format!(
                "auth_callback_path '{}' must start with '/'",
                self.auth_callback_path
            )));
        }
        self.dark_hours.validate()
    }

    /// Splits `tooltip_attribute` into its name and optional value.
    pub fn tooltip_selector(&self) -> (&str, Option<&str>) {
        match self.tooltip_attribute.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (self.tooltip_attribute.trim(), None),
        }
    }
}
