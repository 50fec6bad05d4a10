//! Error types for SandboxMeta
//!
//! Looking a key up never fails; absence is a normal result. Errors only
//! arise when a key or value cannot be carried by the transports, or when
//! configuration cannot be loaded.

use thiserror::Error;

/// Common result type for SandboxMeta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for SandboxMeta
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid metadata key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("invalid metadata value for key {key:?}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Check if the error was caused by caller-supplied metadata
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidKey { .. } | Self::InvalidValue { .. })
    }
}
