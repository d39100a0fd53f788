use crate::{RackError, RackResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default bound on the undo stack.
pub const MAX_HISTORY_DEPTH: usize = 50;

/// Default rack height in rack units.
pub const DEFAULT_RACK_HEIGHT: u32 = 42;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub max_history_depth: Option<usize>,
    #[serde(default)]
    pub default_rack_height: Option<u32>,
    #[serde(default)]
    pub default_rack_name: Option<String>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/rackplan/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("rackplan/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("rackplan\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load the user config, falling back to defaults when it is missing or unreadable.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(config_path) => Self::load_from(&config_path),
            None => Self::default(),
        }
    }

    /// Load the config at `path`. A malformed file is logged and replaced by defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Could not read config {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_toml_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> RackResult<Self> {
        toml::from_str(content).map_err(|e| RackError::Config(e.to_string()))
    }

    /// Undo depth bound, never below 1.
    pub fn effective_max_history_depth(&self) -> usize {
        self.max_history_depth.unwrap_or(MAX_HISTORY_DEPTH).max(1)
    }

    pub fn effective_default_rack_height(&self) -> u32 {
        self.default_rack_height.unwrap_or(DEFAULT_RACK_HEIGHT).max(1)
    }

    pub fn effective_default_rack_name(&self) -> &str {
        self.default_rack_name.as_deref().unwrap_or("Rack")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.effective_max_history_depth(), MAX_HISTORY_DEPTH);
        assert_eq!(config.effective_default_rack_height(), DEFAULT_RACK_HEIGHT);
        assert_eq!(config.effective_default_rack_name(), "Rack");
    }

    #[test]
    fn test_parse_partial_config() {
        let config = AppConfig::from_toml_str("max_history_depth = 10\n").unwrap();
        assert_eq!(config.effective_max_history_depth(), 10);
        assert_eq!(config.effective_default_rack_height(), DEFAULT_RACK_HEIGHT);
    }

    #[test]
    fn test_zero_depth_is_clamped() {
        let config = AppConfig::from_toml_str("max_history_depth = 0").unwrap();
        assert_eq!(config.effective_max_history_depth(), 1);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let err = AppConfig::from_toml_str("max_history_depth = \"lots\"").unwrap_err();
        assert!(matches!(err, RackError::Config(_)));
    }

    #[test]
    fn test_load_from_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_history_depth = [").unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.max_history_depth, None);
        assert_eq!(config.effective_max_history_depth(), MAX_HISTORY_DEPTH);
    }

    #[test]
    fn test_load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_rack_height = 24\n").unwrap();

        assert_eq!(AppConfig::load_from(&path).effective_default_rack_height(), 24);
        assert!(AppConfig::load_from(&dir.path().join("missing.toml"))
            .default_rack_height
            .is_none());
    }
}
