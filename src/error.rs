//! Error types for wsman library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for wsman operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wsman library
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to encode settings file: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Type mismatch for {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to read '{key}' from store: {reason}")]
    StoreRead { key: String, reason: String },

    #[error("Failed to write '{key}' to store: {reason}")]
    StoreWrite { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Custom Data Errors
    // -------------------------------------------------------------------------
    #[error("Invalid custom data key '{key}': {reason}")]
    InvalidCustomDataKey { key: String, reason: String },

    #[error("Control key '{0}' lies inside the reserved custom data namespace")]
    ReservedKey(String),

    // -------------------------------------------------------------------------
    // Handler Errors
    // -------------------------------------------------------------------------
    #[error("Handler for {expected} was given '{key}' of type {actual}")]
    HandlerMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Handler failed for '{key}': {reason}")]
    Handler { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this error came from reading or writing a snapshot store
    #[must_use]
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Error::FileRead { .. }
                | Error::FileWrite { .. }
                | Error::DirectoryCreate { .. }
                | Error::Parse { .. }
                | Error::Encode(_)
                | Error::TypeMismatch { .. }
                | Error::StoreRead { .. }
                | Error::StoreWrite { .. }
        )
    }

    /// Check if this error is a rejected key (custom data or reserved namespace)
    #[must_use]
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidCustomDataKey { .. } | Error::ReservedKey(_)
        )
    }
}
