//! Engine and application settings files
//!
//! Settings live in TOML or RON files next to the scene assets. The format
//! is picked from the file extension; a missing file means built-in
//! defaults, while a present but malformed one is an error naming the file.

use std::path::{Path, PathBuf};

pub use serde::{Deserialize, Serialize};

mod scene_config;

pub use scene_config::SceneConfig;

/// Settings file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl ConfigFormat {
    /// Format for `path`, or `UnsupportedFormat` for any other extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// A settings struct that can be read from and written to a settings file
///
/// Fields the file leaves out take their values from `Default` when the
/// implementor is annotated with `#[serde(default)]`.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Read settings from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match format {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| e.to_string()),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| e.to_string()),
        };
        let settings = parsed.map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Read settings, using the defaults when `path` does not exist
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Write settings in the format named by the extension of `path`
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
            ConfigFormat::Ron => {
                ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).map_err(|e| e.to_string())
            }
        }
        .map_err(|reason| ConfigError::Serialize {
            path: path.to_path_buf(),
            reason,
        })?;

        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Failures reading or writing a settings file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read or written
    #[error("settings file {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Settings file contents do not match the settings struct
    #[error("invalid settings in {path}: {reason}")]
    Parse {
        /// File involved
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Settings could not be encoded
    #[error("could not encode settings for {path}: {reason}")]
    Serialize {
        /// File involved
        path: PathBuf,
        /// Encoder message
        reason: String,
    },

    /// Extension is neither `.toml` nor `.ron`
    #[error("settings file {0} must end in .toml or .ron")]
    UnsupportedFormat(PathBuf),
}
