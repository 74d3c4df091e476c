//! Error types and error handling for the dxray service.
//!
//! This module defines the error types used throughout the
//! application. Protocol-specific handling (HTTP status codes)
//! lives in the respective adapter modules.

use thiserror::Error;

/// Result type alias for dxray operations
pub type Result<T> = std::result::Result<T, DxrayError>;

/// Main error type for the dxray service
#[derive(Error, Debug)]
pub enum DxrayError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Failed to parse descriptor: {0}")]
    ParseError(String),

    #[error("Ambiguous identifier: {0}")]
    AmbiguousIdentifier(String),

    #[error("Search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("A full scan is already running")]
    ScanInProgress,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl DxrayError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Convert an IO error raised while touching `what`, mapping a
    /// missing file to `NotFound`.
    pub fn from_io(err: std::io::Error, what: impl std::fmt::Display) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            DxrayError::NotFound(what.to_string())
        } else {
            DxrayError::IoError(err)
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DxrayError::NotFound(_))
    }

    /// Check if this is a conflict error (scan already running)
    pub fn is_conflict(&self) -> bool {
        matches!(self, DxrayError::ScanInProgress)
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            DxrayError::InvalidEntry(_)
                | DxrayError::AmbiguousIdentifier(_)
                | DxrayError::InvalidQuery(_)
                | DxrayError::ConfigError(_)
        )
    }

    /// Check if this is a cancellation rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DxrayError::Cancelled)
    }
}
