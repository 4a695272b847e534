use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::Validate;

/// Cached YAML-file-backed configuration. A missing file yields the default
/// config; unreadable or invalid content is an error, not a silent default.
pub struct ConfigManager<TConfig>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    path: PathBuf,
    config: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<TConfig>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(Mutex::new(None)),
        }
    }

    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut current = self.config.lock().unwrap();

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        if !self.path.exists() {
            return Ok(TConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read config {}: {}", self.path.display(), e))?;
        let config: TConfig = serde_yaml_ng::from_str(&content)
            .map_err(|e| format!("Failed to deserialize config: {}", e))?;

        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        *current = Some(config.clone());
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let serialized = serde_yaml_ng::to_string(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&self.path, serialized)
            .map_err(|e| format!("Failed to write config {}: {}", self.path.display(), e))?;

        let mut current = self.config.lock().unwrap();
        *current = Some(config.clone());
        Ok(())
    }
}
