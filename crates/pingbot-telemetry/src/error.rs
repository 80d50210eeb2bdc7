//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level, a directive or the format could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A subscriber is already installed, or installing it failed.
    #[error("Initialization error: {0}")]
    InitError(String),

    /// The log directory could not be created.
    #[error("Cannot create log directory {path}: {source}")]
    DirectoryError {
        /// Directory that was requested.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
