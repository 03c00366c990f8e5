//! # Application Configuration
//!
//! One TOML file configures the whole app:
//!
//! ```toml
//! [world]        # meadow_procedural::WorldConfig
//! [camera]       # CameraConfig
//! [frame]        # FrameLoopConfig
//! ```
//!
//! Every table and key is optional; missing ones take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use meadow_procedural::{ConfigError, WorldConfig};

use crate::camera::CameraConfig;
use crate::frame_loop::FrameLoopConfig;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// World generation configuration rejected.
    #[error("world configuration: {0}")]
    World(#[from] ConfigError),

    /// Camera tuning rejected.
    #[error("camera.{field} is out of range: {value}")]
    InvalidCamera {
        /// Offending field.
        field: String,
        /// The rejected value.
        value: f64,
    },

    /// Frame loop tuning rejected.
    #[error("frame.target_fps must be positive")]
    InvalidFrameRate,

    /// TOML did not parse into an application config.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be rendered back to TOML.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Bad command line.
    #[error("{0}")]
    Usage(String),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Complete application configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// World generation.
    pub world: WorldConfig,
    /// Camera tuning.
    pub camera: CameraConfig,
    /// Frame loop tuning.
    pub frame: FrameLoopConfig,
}

impl AppConfig {
    /// Defaults with the world replaced by a named preset.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown preset name.
    pub fn with_preset(name: &str) -> AppResult<Self> {
        Ok(Self {
            world: WorldConfig::preset(name)?,
            ..Self::default()
        })
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or any section is invalid.
    pub fn from_toml_str(text: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> AppResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> AppResult<()> {
        self.world.validate()?;
        self.camera.validate()?;
        if self.frame.target_fps == 0 {
            return Err(AppError::InvalidFrameRate);
        }
        Ok(())
    }
}
