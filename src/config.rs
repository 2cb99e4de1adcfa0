// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the analytics engine

pub mod analytics_config;

use crate::constants::env_config;
use crate::errors::AnalyticsResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use analytics_config::{ClassificationConfig, LoadConfig};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
}

impl EngineConfig {
    /// Load configuration, first match wins:
    /// explicit path, `load_engine.toml` in the working directory,
    /// `$LOAD_ENGINE_CONFIG`, the user config directory, built-in defaults.
    pub fn load(path: Option<String>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(&config_path);
        }

        if Path::new(env_config::DEFAULT_CONFIG_FILE).exists() {
            return Self::load_from_file(env_config::DEFAULT_CONFIG_FILE);
        }

        if let Some(env_path) = env_config::config_path() {
            return Self::load_from_file(&env_path);
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from_file(&user_path.to_string_lossy());
            }
        }

        debug!("No engine config file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate configuration from a specific file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config file: {}", path))?;

        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse engine config file: {}", path))?;

        config
            .validate()
            .with_context(|| format!("Invalid engine config file: {}", path))?;

        debug!(config.path = %path, "Loaded engine config");
        Ok(config)
    }

    pub fn save(&self, path: Option<String>) -> Result<()> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::user_config_path().unwrap_or_else(|| env_config::DEFAULT_CONFIG_FILE.into()),
        };

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write engine config file: {}", config_path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        self.load.validate()?;
        self.classification.validate()
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("training-load-engine/config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::trend::EmaSeed;
    use tempfile::TempDir;

    fn create_temp_config_file(content: &str) -> (TempDir, String) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).expect("Failed to write temp config");
        (temp_dir, config_path.to_string_lossy().to_string())
    }

    #[test]
    fn test_config_load_from_file() {
        let (_temp_dir, config_path) = create_temp_config_file(
            r#"
[load]
pause_threshold_seconds = 120.0
ema_seed = "zero"
utc_offset_minutes = 60

[classification]
min_match_score = 60.0
"#,
        );

        let config = EngineConfig::load(Some(config_path)).expect("Failed to load config");

        assert_eq!(config.load.pause_threshold_seconds, 120.0);
        assert_eq!(config.load.ema_seed, EmaSeed::Zero);
        assert_eq!(config.load.utc_offset_minutes, 60);
        // Unspecified keys keep their defaults
        assert_eq!(config.load.fitness_time_constant_days, 42);
        assert_eq!(config.classification.min_match_score, 60.0);
        assert_eq!(config.classification.display_floor_percent, 0.1);
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        let (_temp_dir, config_path) = create_temp_config_file(
            r#"
[load]
fitness_time_constant_days = 0
"#,
        );

        let result = EngineConfig::load_from_file(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_missing_explicit_path_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("missing.toml");
        assert!(EngineConfig::load(Some(missing.to_string_lossy().to_string())).is_err());
    }

    #[test]
    fn test_config_save_and_reload() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested/config.toml");
        let path = path.to_string_lossy().to_string();

        let mut config = EngineConfig::default();
        config.load.fatigue_time_constant_days = 10;
        config.save(Some(path.clone())).expect("Failed to save config");

        let reloaded = EngineConfig::load_from_file(&path).expect("Failed to reload config");
        assert_eq!(reloaded, config);
    }
}
