//! Scene loading configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Config;

/// Settings that control where scene documents come from and how strictly
/// they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Directory that scene file names are resolved against
    pub scene_dir: PathBuf,

    /// Scene file loaded when none is requested explicitly
    pub default_scene: String,

    /// Enabled-light count above which a warning is emitted
    pub max_enabled_lights: usize,

    /// Default log filter used by applications
    pub log_level: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scene_dir: PathBuf::from("scenes"),
            default_scene: "checkers.xml".to_string(),
            max_enabled_lights: 8,
            log_level: "info".to_string(),
        }
    }
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Resolve a scene file name against the scene directory
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, file_name: impl AsRef<Path>) -> PathBuf {
        let file_name = file_name.as_ref();
        if file_name.is_absolute() {
            file_name.to_path_buf()
        } else {
            self.scene_dir.join(file_name)
        }
    }

    /// Builder pattern: set the scene directory
    pub fn with_scene_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scene_dir = dir.into();
        self
    }

    /// Builder pattern: set the enabled-light warning threshold
    pub fn with_max_enabled_lights(mut self, max: usize) -> Self {
        self.max_enabled_lights = max;
        self
    }
}
