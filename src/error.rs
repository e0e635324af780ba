//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::config::ConfigError;
pub use crate::notion::NotionError;

/// Main application error type.
///
/// This is the top-level error type that encompasses all error types
/// in the application. It uses `thiserror` for automatic error derivation
/// and conversion.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notion API-related errors
    #[error("Notion error: {0}")]
    Notion(#[from] NotionError),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// The command was interrupted before completing
    #[error("Interrupted")]
    Interrupted,
}
