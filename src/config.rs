use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, read_to_string, write};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct InspectorConfig {
    #[serde(default = "default_gif_folder")]
    pub gif_folder: PathBuf,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "Dark".to_string()
}

fn default_gif_folder() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".config"))
        })
        .map(|dir| dir.join(PathBuf::from("gifinspector")))
        .ok_or_else(|| {
            Error::Config(
                "Could not find config directory. Please set HOME or XDG_CONFIG_HOME environment variable.".to_string(),
            )
        })?;

    if !config_dir.exists() {
        create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            gif_folder: default_gif_folder(),
            theme: default_theme(),
        }
    }
}

impl InspectorConfig {
    pub fn load_or_default() -> Result<Self> {
        let config_dir = get_config_dir()?;
        Self::load_from(&config_dir.join("config.json"))
    }

    pub fn save(&self) -> Result<()> {
        let config_dir = get_config_dir()?;
        self.save_to(&config_dir.join("config.json"))
    }

    fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = read_to_string(config_path)?;
            let config: Self =
                serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
            config.save_to(config_path)?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            create_dir_all(parent)?;
        }
        let content =
            serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        write(config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults_and_writes_them() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.json");

        let config = InspectorConfig::load_from(&path).expect("load defaults");

        assert_eq!(config.theme, "Dark");
        assert!(path.exists());
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.json");

        let mut config = InspectorConfig::default();
        config.gif_folder = PathBuf::from("/tmp/sprites");
        config.theme = "Nord".to_string();
        config.save_to(&path).expect("save");

        let loaded = InspectorConfig::load_from(&path).expect("load");
        assert_eq!(loaded.gif_folder, PathBuf::from("/tmp/sprites"));
        assert_eq!(loaded.theme, "Nord");
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"theme":"Light"}"#).expect("write");

        let loaded = InspectorConfig::load_from(&path).expect("load");
        assert_eq!(loaded.theme, "Light");
        assert_eq!(loaded.gif_folder, default_gif_folder());
    }
}
