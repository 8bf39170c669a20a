//! Stored preference modes and resolved color modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// The resolved, binary appearance applied to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    /// Maps a "prefers dark" flag to a color mode.
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == ColorMode::Dark
    }

    /// Returns the opposite color mode.
    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ColorMode> for ThemeMode {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => ThemeMode::Light,
            ColorMode::Dark => ThemeMode::Dark,
        }
    }
}

/// The persisted user preference.
///
/// `Light` and `Dark` pin the appearance; `System` follows the OS color
/// scheme signal (and the time-of-day policy at startup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    System,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    /// Returns the literal color mode for `Light`/`Dark`, `None` for `System`.
    pub fn literal(self) -> Option<ColorMode> {
        match self {
            ThemeMode::Light => Some(ColorMode::Light),
            ThemeMode::Dark => Some(ColorMode::Dark),
            ThemeMode::System => None,
        }
    }

    pub fn is_system(self) -> bool {
        self == ThemeMode::System
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => Err(ThemeError::InvalidMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_mode_parse() {
        assert_eq!("light".parse::<ThemeMode>().unwrap(), ThemeMode::Light);
        assert_eq!("dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert_eq!(" system\n".parse::<ThemeMode>().unwrap(), ThemeMode::System);
    }

    #[test]
    fn test_theme_mode_parse_rejects_unknown() {
        let err = "Dark".parse::<ThemeMode>().unwrap_err();
        assert!(matches!(err, ThemeError::InvalidMode(ref v) if v == "Dark"));
        assert!("".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_theme_mode_default_is_light() {
        assert_eq!(ThemeMode::default(), ThemeMode::Light);
    }

    #[test]
    fn test_theme_mode_display_matches_storage_form() {
        for mode in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System] {
            assert_eq!(mode.to_string().parse::<ThemeMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_theme_mode_literal() {
        assert_eq!(ThemeMode::Light.literal(), Some(ColorMode::Light));
        assert_eq!(ThemeMode::Dark.literal(), Some(ColorMode::Dark));
        assert_eq!(ThemeMode::System.literal(), None);
    }

    #[test]
    fn test_color_mode_toggled() {
        assert_eq!(ColorMode::Light.toggled(), ColorMode::Dark);
        assert_eq!(ColorMode::Dark.toggled().toggled(), ColorMode::Dark);
    }

    #[test]
    fn test_color_mode_into_theme_mode_is_never_system() {
        assert_eq!(ThemeMode::from(ColorMode::Dark), ThemeMode::Dark);
        assert_eq!(ThemeMode::from(ColorMode::Light), ThemeMode::Light);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ThemeMode::System).unwrap();
        assert_eq!(json, "\"system\"");
        let mode: ColorMode = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(mode, ColorMode::Dark);
    }
}
