//! Error types for the domain crate.

use thiserror::Error;

/// Errors raised while reading run configuration from the environment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing environment variable: {var}")]
    Missing { var: String },

    /// A variable is set but its value can't be used
    #[error("Invalid value for {var}: {value} ({reason})")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ConfigError>;
