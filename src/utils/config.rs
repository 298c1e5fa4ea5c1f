use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::algorithms::MercatorProjector;
use crate::core::DEFAULT_TILE_SIZE;

/// Application-level configuration, loaded once at startup and passed down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Projection parameters shared by every georeference
    pub projection: ProjectionConfig,
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Tile size of the map layers in pixels
    pub tile_size: f64,
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration parameter {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },

    #[error("Failed to access config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl AppConfig {
    /// Load and validate configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;

        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tile_size = self.projection.tile_size;
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "projection.tile_size".to_string(),
                value: tile_size.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidParameter {
                parameter: "log_level".to_string(),
                value: self.log_level.clone(),
                reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Projector for the configured tile size
    pub fn projector(&self) -> Result<MercatorProjector, ConfigError> {
        MercatorProjector::new(self.projection.tile_size).map_err(|e| ConfigError::InvalidParameter {
            parameter: "projection.tile_size".to_string(),
            value: self.projection.tile_size.to_string(),
            reason: e.to_string(),
        })
    }
}
