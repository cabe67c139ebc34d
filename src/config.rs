/// Application configuration
///
/// The source behavior for a cancelled file dialog is ambiguous (keep the
/// current image vs. drop it), so the choice is an explicit, typed setting
/// instead of an accident of the code path. The config is read from an
/// optional JSON file and never written back.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a cancelled file dialog does to the current selection
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// Leave the selected image, preview and caption untouched
    #[default]
    KeepCurrent,
    /// Drop the selection and return to the empty viewport
    ClearSelection,
}

/// All user-tunable settings
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub on_cancel: CancelPolicy,
}

impl AppConfig {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load the config file, falling back to defaults when it is missing
    /// or malformed.
    ///
    /// The file lives at:
    /// - Linux: ~/.config/caption-studio/config.json
    /// - macOS: ~/Library/Application Support/caption-studio/config.json
    /// - Windows: %APPDATA%\caption-studio\config.json
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("caption-studio");
        path.push("config.json");
        Some(path)
    }
}
