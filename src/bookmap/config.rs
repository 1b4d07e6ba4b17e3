use crate::error::{BookmapError, Result};
use crate::model::Coordinate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATA_FILE: &str = "bookmarks.csv";
const DEFAULT_PHOTO_DIR: &str = "photos";

pub const KEYS: [&str; 3] = ["data-file", "photo-dir", "fallback-center"];

/// Configuration for bookmap, stored in <data-dir>/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookmapConfig {
    /// Bookmark table, relative to the data directory unless absolute
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Directory for photo attachments, relative to the data directory unless absolute
    #[serde(default = "default_photo_dir")]
    pub photo_dir: String,

    /// Map center used while there are no bookmarks
    #[serde(default = "default_fallback_center")]
    pub fallback_center: Coordinate,
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_photo_dir() -> String {
    DEFAULT_PHOTO_DIR.to_string()
}

fn default_fallback_center() -> Coordinate {
    Coordinate::DEFAULT_CENTER
}

impl Default for BookmapConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            photo_dir: default_photo_dir(),
            fallback_center: default_fallback_center(),
        }
    }
}

impl BookmapConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(BookmapError::Io)?;
        let mut config: BookmapConfig =
            serde_json::from_str(&content).map_err(BookmapError::Serialization)?;

        // Hand edits bypass `set`; an invalid center falls back to the default
        let center = config.fallback_center;
        if let Err(e) = Coordinate::new(center.latitude, center.longitude) {
            warn!(
                "Ignoring fallback_center in {}: {}",
                config_path.display(),
                e
            );
            config.fallback_center = default_fallback_center();
        }
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(BookmapError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(BookmapError::Serialization)?;
        fs::write(config_path, content).map_err(BookmapError::Io)?;
        Ok(())
    }

    pub fn exists_in<P: AsRef<Path>>(config_dir: P) -> bool {
        config_dir.as_ref().join(CONFIG_FILENAME).exists()
    }

    pub fn data_file_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.data_file)
    }

    pub fn photo_dir_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.photo_dir)
    }

    /// Read a value by its command-line key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data-file" => Some(self.data_file.clone()),
            "photo-dir" => Some(self.photo_dir.clone()),
            "fallback-center" => Some(self.fallback_center.to_string()),
            _ => None,
        }
    }

    /// Set a value by its command-line key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "data-file" | "photo-dir" if value.is_empty() => {
                Err(BookmapError::Config(format!("{} cannot be empty", key)))
            }
            "data-file" => {
                self.data_file = value.to_string();
                Ok(())
            }
            "photo-dir" => {
                self.photo_dir = value.to_string();
                Ok(())
            }
            "fallback-center" => {
                self.fallback_center = value.parse()?;
                Ok(())
            }
            other => Err(BookmapError::Config(format!(
                "Unknown config key: {} (known keys: {})",
                other,
                KEYS.join(", ")
            ))),
        }
    }
}
