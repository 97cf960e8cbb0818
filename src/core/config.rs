use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::explain::{DEFAULT_GATEWAY_MODEL, DEFAULT_GATEWAY_URL};
use crate::error::{DiagError, Result};

pub const DEFAULT_MAX_EVENTS: usize = 50;
const DEFAULT_IMAGING_TOOL: &str = "DumpIt.exe";
const DEFAULT_OUTPUT_DIR: &str = "Output";

fn default_max_events() -> usize {
    DEFAULT_MAX_EVENTS
}

/// User settings, stored as JSON. The gateway API key is not stored here; it is
/// read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub imaging_tool_path: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_max_events")]
    pub max_events: usize,
    #[serde(default)]
    pub imaging_timeout_secs: Option<u64>,
    #[serde(default)]
    pub gateway_url: Option<String>,
    #[serde(default)]
    pub gateway_model: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            imaging_tool_path: None,
            output_dir: None,
            max_events: DEFAULT_MAX_EVENTS,
            imaging_timeout_secs: None,
            gateway_url: None,
            gateway_model: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Missing, empty or unreadable-as-JSON files all yield the default config
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read_to_string(config_path)?;
        if data.trim().is_empty() {
            return Ok(Config::default());
        }

        Ok(serde_json::from_str(&data).unwrap_or_else(|e| {
            warn!(
                "Ignoring corrupt config file {}: {}",
                config_path.display(),
                e
            );
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DiagError::config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let data = serde_json::to_string_pretty(self)?;
        fs::write(config_path, data).map_err(|e| {
            DiagError::config(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DiagError::config("Could not determine config directory"))?;

        Ok(config_dir.join("scantool").join("config.json"))
    }

    /// Configured imaging tool, or `DumpIt.exe` next to the running binary
    pub fn imaging_tool(&self) -> PathBuf {
        self.imaging_tool_path
            .clone()
            .unwrap_or_else(|| executable_dir().join(DEFAULT_IMAGING_TOOL))
    }

    /// Configured output directory, or `Output` next to the running binary
    pub fn output_directory(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| executable_dir().join(DEFAULT_OUTPUT_DIR))
    }

    pub fn imaging_timeout(&self) -> Option<Duration> {
        self.imaging_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn gateway_url(&self) -> &str {
        self.gateway_url.as_deref().unwrap_or(DEFAULT_GATEWAY_URL)
    }

    pub fn gateway_model(&self) -> &str {
        self.gateway_model.as_deref().unwrap_or(DEFAULT_GATEWAY_MODEL)
    }

    pub fn set_imaging_tool_path(&mut self, path: PathBuf) {
        self.imaging_tool_path = Some(path);
    }

    pub fn set_output_dir(&mut self, path: PathBuf) {
        self.output_dir = Some(path);
    }

    pub fn set_max_events(&mut self, max_events: usize) -> Result<()> {
        if max_events == 0 {
            return Err(DiagError::config("max_events must be at least 1"));
        }
        self.max_events = max_events;
        Ok(())
    }

    /// `0` clears the timeout
    pub fn set_imaging_timeout_secs(&mut self, secs: u64) {
        self.imaging_timeout_secs = (secs > 0).then_some(secs);
    }
}

fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_events, 50);
        assert!(config.imaging_timeout().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_imaging_tool_path(PathBuf::from("/opt/tools/DumpIt.exe"));
        config.set_output_dir(PathBuf::from("/var/images"));
        config.set_max_events(20).unwrap();
        config.set_imaging_timeout_secs(600);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.imaging_tool(), PathBuf::from("/opt/tools/DumpIt.exe"));
        assert_eq!(loaded.imaging_timeout(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{"gateway_model":"gpt-4o-mini"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.max_events, DEFAULT_MAX_EVENTS);
        assert_eq!(config.gateway_model(), "gpt-4o-mini");
        assert_eq!(config.gateway_url(), DEFAULT_GATEWAY_URL);
    }

    #[test]
    fn test_zero_values() {
        let mut config = Config::default();
        assert!(config.set_max_events(0).is_err());
        assert_eq!(config.max_events, DEFAULT_MAX_EVENTS);

        config.set_imaging_timeout_secs(30);
        config.set_imaging_timeout_secs(0);
        assert_eq!(config.imaging_timeout_secs, None);
    }

    #[test]
    fn test_default_tool_sits_next_to_binary() {
        let config = Config::default();
        assert!(config.imaging_tool().ends_with("DumpIt.exe"));
        assert!(config.output_directory().ends_with("Output"));
    }
}
