//! Configuration for the TVI engine.

use crate::core::DEFAULT_BASELINE_WINDOW;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of the file-backed store and run statistics
    pub data_path: PathBuf,

    /// Scoring options
    #[serde(default)]
    pub engine: EngineConfig,

    /// Default tracing filter (overridden by RUST_LOG)
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tvi-engine");

        Self {
            data_path: data_dir,
            engine: EngineConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file, falling back to defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tvi-engine")
            .join("config.json")
    }

    /// Path of the persisted run statistics.
    pub fn stats_path(&self) -> PathBuf {
        self.data_path.join("analysis_stats.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)?;
        Ok(())
    }
}

/// Options for historical comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of most recent unit scores averaged into the baseline
    pub baseline_window: usize,
    /// Rank against the session's unit only, instead of all results
    pub unit_scoped_percentile: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            baseline_window: DEFAULT_BASELINE_WINDOW,
            unit_scoped_percentile: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.baseline_window, 10);
        assert!(config.engine.unit_scoped_percentile);
        assert_eq!(config.log_filter, "info");
        assert!(config.data_path.ends_with("tvi-engine"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "data_path": "/tmp/tvi" }"#).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/tvi"));
        assert_eq!(config.engine.baseline_window, 10);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.stats_path(), PathBuf::from("/tmp/tvi/analysis_stats.json"));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("tvi-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.json");
        assert_eq!(Config::load_from(&path).unwrap().engine.baseline_window, 10);

        let mut config = Config::default();
        config.engine.baseline_window = 5;
        config.engine.unit_scoped_percentile = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.engine.baseline_window, 5);
        assert!(!loaded.engine.unit_scoped_percentile);

        let _ = std::fs::remove_dir_all(dir);
    }
}
