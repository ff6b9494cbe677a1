//! Configuration loading for grid generation.
//!
//! Defines a strongly-typed struct mirroring the YAML configuration used by
//! embedding applications, and a loader that reads and validates the file.
//! All fields have defaults matching the canonical field size the original
//! generator used.

use std::path::Path;

use serde::Deserialize;

use crate::grid::DEFAULT_INV_MAX_SCALE;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Grid generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridConfig {
    /// Number of columns in the generated field.
    #[serde(default = "default_width")]
    pub width: usize,

    /// Number of rows in the generated field.
    #[serde(default = "default_height")]
    pub height: usize,

    /// Inverse sampling scale passed to the elevation source; controls
    /// terrain feature frequency.
    #[serde(default = "default_inv_max_scale")]
    pub inv_max_scale: f64,
}

const fn default_width() -> usize {
    1440
}

const fn default_height() -> usize {
    810
}

const fn default_inv_max_scale() -> f64 {
    DEFAULT_INV_MAX_SCALE
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            inv_max_scale: default_inv_max_scale(),
        }
    }
}

impl GridConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}
