//! Error types for rdhost
//!
//! This module defines all error types used throughout the workspace,
//! providing consistent error handling and user-friendly error messages.

use thiserror::Error;

/// Main error type for rdhost
#[derive(Error, Debug)]
pub enum RdhostError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to keyring operations
    #[error("Keyring error: {0}")]
    Keyring(#[from] KeyringError),

    /// Errors raised by the session lifecycle controller
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save configuration file: {path}")]
    SaveFailed { path: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// System keyring operation errors
#[derive(Error, Debug)]
pub enum KeyringError {
    #[error("Keyring service unavailable")]
    ServiceUnavailable,

    #[error("Failed to store credential in keyring")]
    StoreFailed,

    #[error("Failed to retrieve credential from keyring")]
    RetrieveFailed,

    #[error("Credential not found in keyring")]
    NotFound,
}

/// Errors reported synchronously by a session engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine build does not expose this option
    #[error("Engine does not support option: {option}")]
    Unsupported { option: &'static str },

    /// The engine refused the request
    #[error("Engine rejected request: {reason}")]
    Rejected { reason: String },
}

/// Session lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Engine did not confirm disconnection within {seconds} seconds")]
    DisconnectTimeout { seconds: u64 },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RdhostError>;
