use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::validator::{DEFAULT_CITY, DEFAULT_MAX_LATENCY, Expectations};

/// Credentials and endpoint for OpenWeather.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,

    /// Overrides the public endpoint, e.g. for a staging proxy.
    pub base_url: Option<String>,
}

/// What the check expects from the API.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CheckConfig {
    pub city: Option<String>,
    pub max_latency_ms: Option<u64>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [openweather]
/// api_key = "..."
///
/// [check]
/// city = "London"
/// max_latency_ms = 10000
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub openweather: OpenWeatherConfig,

    #[serde(default)]
    pub check: CheckConfig,
}

impl Config {
    /// Load config from the platform config dir, or an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-probe", "weather-probe")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    /// Pick the API key: an explicit value (flag or environment) wins over the file.
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .or(self.openweather.api_key.as_deref())
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: set OPENWEATHER_API_KEY, pass --api-key, or run `weather-probe configure`."
                )
            })
    }

    pub fn city(&self) -> &str {
        self.check
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY)
    }

    pub fn max_latency(&self) -> Duration {
        self.check.max_latency_ms.map(Duration::from_millis).unwrap_or(DEFAULT_MAX_LATENCY)
    }

    /// Expectations for the check, from this config.
    pub fn expectations(&self) -> Expectations {
        Expectations::for_city(self.city()).with_max_latency(self.max_latency())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.resolve_api_key(None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: set OPENWEATHER_API_KEY"));
    }

    #[test]
    fn explicit_api_key_overrides_file() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.resolve_api_key(Some("ENV_KEY")).unwrap(), "ENV_KEY");
        assert_eq!(cfg.resolve_api_key(None).unwrap(), "FILE_KEY");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert!(cfg.resolve_api_key(None).is_err());
    }

    #[test]
    fn defaults_when_check_section_is_empty() {
        let cfg = Config::default();

        assert_eq!(cfg.city(), "London");
        assert_eq!(cfg.max_latency(), Duration::from_secs(10));
        assert_eq!(cfg.expectations(), Expectations::default());
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: Config = toml::from_str(
            r#"
            [check]
            city = "Paris"
            max_latency_ms = 2500
            "#,
        )
        .unwrap();

        assert_eq!(cfg.openweather, OpenWeatherConfig::default());
        assert_eq!(cfg.city(), "Paris");
        assert_eq!(cfg.expectations().max_latency, Duration::from_millis(2500));
    }

    #[test]
    fn configured_city_is_trimmed() {
        let mut cfg = Config::default();
        cfg.check.city = Some("  Paris ".into());
        assert_eq!(cfg.expectations().city, "Paris");

        cfg.check.city = Some("   ".into());
        assert_eq!(cfg.city(), "London");
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.check.city = Some("Berlin".into());
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "openweather = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
