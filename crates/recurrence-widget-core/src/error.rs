//! Core error types for recurrence-widget-core.
//!
//! Widget handlers never fail: missing markup degrades to a no-op. Errors
//! only surface from configuration, rule parsing and form read-back.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for recurrence-widget-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Recurrence rule errors
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Config directory could not be resolved or created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Recurrence rule errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Rule string has no FREQ part
    #[error("Rule is missing FREQ")]
    MissingFrequency,

    /// Unrecognized key in a rule string
    #[error("Unknown rule part: {0}")]
    UnknownPart(String),

    /// A rule part is not `KEY=VALUE`
    #[error("Malformed rule part: {0}")]
    MalformedPart(String),

    /// COUNT and UNTIL given together
    #[error("COUNT and UNTIL are mutually exclusive")]
    ConflictingEnding,

    /// Invalid value for a rule field
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

impl RuleError {
    pub(crate) fn invalid(field: &str, value: impl Into<String>) -> Self {
        RuleError::InvalidValue {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Custom(format!("TOML parse error: {err}"))
    }
}

impl From<toml::ser::Error> for CoreError {
    fn from(err: toml::ser::Error) -> Self {
        CoreError::Custom(format!("TOML serialize error: {err}"))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
