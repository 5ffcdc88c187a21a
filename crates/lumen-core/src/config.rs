//! Configuration management for Lumen.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the engine script location.
pub const ENV_AXE_SCRIPT: &str = "LUMEN_AXE_SCRIPT";
/// Environment variable overriding the scan retry budget.
pub const ENV_SCAN_RETRIES: &str = "LUMEN_SCAN_RETRIES";
/// Environment variable overriding the delay between retries.
pub const ENV_SCAN_INTERVAL_MS: &str = "LUMEN_SCAN_INTERVAL_MS";
/// Environment variable overriding browser headless mode.
pub const ENV_HEADLESS: &str = "LUMEN_HEADLESS";

/// Main application configuration.
///
/// This is loaded from `~/.config/lumen/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scanning engine settings
    pub engine: EngineConfig,
    /// Retry behavior for scans
    pub scanning: ScanningConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `LUMEN_AXE_SCRIPT`: Path to `axe.min.js`
    /// - `LUMEN_SCAN_RETRIES`: Retry budget when violations are found
    /// - `LUMEN_SCAN_INTERVAL_MS`: Delay between retries in milliseconds
    /// - `LUMEN_HEADLESS`: Override browser headless mode (true/false)
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Values that fail to parse are ignored and the configured value is kept.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_AXE_SCRIPT) {
            if !val.is_empty() {
                tracing::debug!("Override engine.script_path from env: {}", val);
                self.engine.script_path = Some(PathBuf::from(val));
            }
        }

        if let Some(val) = lookup(ENV_SCAN_RETRIES) {
            if let Ok(retries) = val.parse() {
                self.scanning.retries = retries;
                tracing::debug!("Override scanning.retries from env: {}", retries);
            }
        }

        if let Some(val) = lookup(ENV_SCAN_INTERVAL_MS) {
            if let Ok(interval) = val.parse() {
                self.scanning.interval_ms = interval;
                tracing::debug!("Override scanning.interval_ms from env: {}", interval);
            }
        }

        if let Some(val) = lookup(ENV_HEADLESS) {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit file.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/lumen/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "lumen", "lumen").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Scanning engine settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Explicit path to `axe.min.js`; discovered under `node_modules` when unset
    pub script_path: Option<PathBuf>,
}

/// Retry behavior when a scan reports violations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Extra scan attempts allowed while violations remain (0 = scan once)
    pub retries: u32,
    /// Delay between attempts in milliseconds
    pub interval_ms: u64,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            retries: 0,
            interval_ms: 1000,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.engine.script_path.is_none());
        assert_eq!(config.scanning.retries, 0);
        assert_eq!(config.scanning.interval_ms, 1000);
        assert!(config.browser.headless);
        assert_eq!(config.browser.navigation_timeout_secs, 30);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[scanning]"));
        assert!(toml_str.contains("[browser]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.scanning.interval_ms, config.scanning.interval_ms);
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.scanning.retries = 2;
        config.engine.script_path = Some(PathBuf::from("/opt/axe/axe.min.js"));

        config.save_to(&config_path).expect("save config");
        let loaded = AppConfig::load_from(&config_path).expect("load config");

        assert_eq!(loaded.scanning.retries, 2);
        assert_eq!(
            loaded.engine.script_path,
            Some(PathBuf::from("/opt/axe/axe.min.js"))
        );
    }

    #[test]
    fn test_load_from_missing_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let err = AppConfig::load_from(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_AXE_SCRIPT, "vendor/axe.min.js"),
            (ENV_SCAN_RETRIES, "3"),
            (ENV_SCAN_INTERVAL_MS, "250"),
            (ENV_HEADLESS, "false"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(
            config.engine.script_path,
            Some(PathBuf::from("vendor/axe.min.js"))
        );
        assert_eq!(config.scanning.retries, 3);
        assert_eq!(config.scanning.interval_ms, 250);
        assert!(!config.browser.headless);
    }

    #[test]
    fn test_env_overrides_ignore_garbage() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            ENV_SCAN_RETRIES => Some("many".to_string()),
            ENV_HEADLESS => Some("maybe".to_string()),
            _ => None,
        });

        assert_eq!(config.scanning.retries, 0);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[scanning]
retries = 4
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.scanning.retries, 4);
        // These should be defaults
        assert_eq!(config.scanning.interval_ms, 1000);
        assert!(config.browser.headless);
    }
}
