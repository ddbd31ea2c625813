//! Custom error types for Rollo.
//!
//! Errors fall into two families: fatal errors that abort a run (a missing
//! source page, broken configuration) and recoverable errors that degrade a
//! single step while the run continues (an unreadable daily record, a failed
//! completion-index scan).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Rollo operations
#[derive(Error, Debug)]
pub enum RolloError {
    // =========================================================================
    // Fatal Errors
    // =========================================================================
    /// The source page listing recurring items could not be loaded
    #[error("Source page '{page}' is unavailable: {message}")]
    SourceUnavailable { page: String, message: String },

    /// Failed to load configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    // =========================================================================
    // Recoverable Errors
    // =========================================================================
    /// A daily record could not be read or written
    #[error("Record '{name}' I/O failure: {message}")]
    RecordIo { name: String, message: String },

    /// The completion index could not be built
    #[error("Completion index query failed: {message}")]
    IndexQuery { message: String },

    // =========================================================================
    // Passthrough Errors
    // =========================================================================
    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RolloError {
    /// Create a source unavailable error
    pub fn source_unavailable(page: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            page: page.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error without an associated file
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error pointing at the offending file
    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create an invalid configuration error for a named field
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a record I/O error
    pub fn record_io(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordIo {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a completion index query error
    pub fn index_query(message: impl Into<String>) -> Self {
        Self::IndexQuery {
            message: message.into(),
        }
    }

    /// Check if the run can continue after this error.
    ///
    /// Recoverable errors affect a single record or the completion index;
    /// the engine logs them and substitutes a neutral value.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RecordIo { .. } | Self::IndexQuery { .. })
    }

    /// Check if this error must abort the run
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::Config { .. } | Self::InvalidConfig { .. }
        )
    }

    /// Process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SourceUnavailable { .. } => 2,
            Self::Config { .. } | Self::InvalidConfig { .. } => 3,
            _ => 1,
        }
    }
}

/// Result type alias for Rollo operations
pub type Result<T> = std::result::Result<T, RolloError>;
