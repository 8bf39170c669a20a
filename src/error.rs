//! Error types.

use std::path::PathBuf;

/// Error returned by theme storage, configuration and setup.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// A stored or configured value is not one of `light`, `dark`, `system`
    #[error("invalid theme mode '{0}', expected light, dark or system")]
    InvalidMode(String),

    /// The preference file could not be read or written
    #[error("preference store {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preference file is not a JSON object of strings
    #[error("malformed preference store: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The YAML configuration could not be parsed
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_yaml::Error),

    /// The configuration parsed but holds out-of-range values
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A browser API was missing or threw
    #[error("browser api error: {0}")]
    Browser(String),

    /// A manager was built without a document surface
    #[error("theme manager requires a document")]
    MissingDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_mode_display() {
        let msg = ThemeError::InvalidMode("sepia".into()).to_string();
        assert!(msg.contains("sepia"));
        assert!(msg.contains("light, dark or system"));
    }

    #[test]
    fn test_storage_error_display_includes_path() {
        let err = ThemeError::Storage {
            path: PathBuf::from("/tmp/prefs.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/prefs.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_serialization_error_from() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ThemeError = json_err.into();
        assert!(matches!(err, ThemeError::Serialization(_)));
    }
}
