//! Game configuration persisted as a TOML file next to the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub window_width: u32,
    pub window_height: u32,
    /// Music volume in [0, 1], fed to the crossfade policy.
    pub music_volume: f32,
    /// Directory holding textures, music and the UI font.
    pub assets_dir: PathBuf,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            music_volume: 0.5,
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl GameSettings {
    /// Loads `settings.toml`, falling back to defaults when it is missing
    /// or unparsable.
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    log::error!("CONFIG: Failed to parse {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) {
        self.save_to(Path::new(SETTINGS_FILE));
    }

    pub fn save_to(&self, path: &Path) {
        match toml::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = std::fs::write(path, content) {
                    log::error!("CONFIG: Failed to write {:?}: {}", path, e);
                }
            }
            Err(e) => log::error!("CONFIG: Failed to serialize settings: {}", e),
        }
    }
}
