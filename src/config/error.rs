//! Configuration-specific error types.

use std::path::PathBuf;

/// Errors that can occur during configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File path was not set
    #[error("Configuration file path not set")]
    FilePathNotSet,

    /// Access token was not set
    #[error("Access token not set, export it as {0}")]
    AccessTokenNotSet(&'static str),

    /// Failed to find the platform configuration directory
    #[error("Failed to find configuration directory")]
    ConfigDirectoryNotFound,

    /// No configuration file exists yet
    #[error("Configuration not found, run the 'configure' command to generate it")]
    NotConfigured,

    /// A database the command needs has no ID configured
    #[error("No {0} database configured, run the 'configure' command to set it")]
    MissingDatabaseId(&'static str),

    /// Failed to load configuration file
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration file
    #[error("Failed to save configuration to {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create configuration directory
    #[error("Failed to create configuration directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    SerializationFailed(String),

    /// Failed to deserialize configuration
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationFailed(String),

    /// A date or time format is not a valid strftime string
    #[error("Invalid {key} '{format}' in configuration")]
    InvalidFormat { key: &'static str, format: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::FilePathNotSet;
        assert!(error.to_string().contains("file path not set"));

        let error = ConfigError::AccessTokenNotSet("NOTION_API_KEY");
        assert!(error.to_string().contains("NOTION_API_KEY"));

        let error = ConfigError::NotConfigured;
        assert!(error.to_string().contains("'configure'"));

        let error = ConfigError::MissingDatabaseId("sprints");
        assert!(error.to_string().contains("No sprints database"));

        let error = ConfigError::DeserializationFailed("test".to_string());
        assert!(error.to_string().contains("test"));

        let error = ConfigError::InvalidFormat {
            key: "date_format",
            format: "%Q".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid date_format '%Q' in configuration");
    }

    #[test]
    fn test_config_error_with_path() {
        let path = PathBuf::from("/test/path");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Denied");
        let error = ConfigError::SaveFailed {
            path: path.clone(),
            source: io_error,
        };
        let error_str = error.to_string();
        assert!(error_str.contains("/test/path"));
    }
}
