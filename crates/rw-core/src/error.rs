//! Error types for rw-core

use thiserror::Error;

/// Core error type for Rewind
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Requested environment has no store configuration
    #[error("[C004] Environment '{name}' not found in config. Available environments: {available}")]
    EnvironmentNotFound { name: String, available: String },

    /// C005: Script name cannot be turned into an identifier
    #[error("[C005] Invalid script name '{name}': {reason}")]
    InvalidScriptName { name: String, reason: String },

    /// C006: IO error
    #[error("[C006] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C007: IO error with file path context
    #[error("[C007] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
