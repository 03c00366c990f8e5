//! # Configuration Error Types
//!
//! Generation itself cannot fail. Everything that can go wrong is caught
//! here, once, when the configuration is loaded and validated.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a [`WorldConfig`](crate::WorldConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value that must be strictly positive and finite was not.
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive {
        /// Dotted path of the offending field.
        field: String,
        /// The rejected value.
        value: f64,
    },

    /// A value that must not be negative was.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Dotted path of the offending field.
        field: String,
        /// The rejected value.
        value: f64,
    },

    /// A range with `min > max`.
    #[error("invalid range for {field}: min {min} > max {max}")]
    InvalidRange {
        /// Dotted path of the offending field.
        field: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A probability outside `[0, 1]`.
    #[error("{field} must be a probability in [0, 1], got {value}")]
    InvalidProbability {
        /// Dotted path of the offending field.
        field: String,
        /// The rejected value.
        value: f64,
    },

    /// A count or budget beyond what the salt layout can address.
    #[error("{field} = {value} exceeds the limit of {limit}")]
    LimitExceeded {
        /// Dotted path of the offending field.
        field: String,
        /// The rejected value.
        value: u64,
        /// Largest accepted value.
        limit: u64,
    },

    /// A pass that may pick from an empty variant set.
    #[error("{0} has an empty variant set")]
    EmptyVariants(String),

    /// Preset name not recognised.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// TOML did not parse into a configuration.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
