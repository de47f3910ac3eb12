use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{model::TemperatureUnit, provider::openmeteo::DEFAULT_BASE_URL};

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Directory holding the built client bundle (`index.html` and assets).
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Settings for the upstream weather API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Days requested upstream, today included.
    pub forecast_days: u8,
    pub unit: TemperatureUnit,
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            forecast_days: 4,
            unit: TemperatureUnit::Fahrenheit,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [server]
/// port = 8080
///
/// [weather]
/// unit = "celsius"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub weather: WeatherApiConfig,
}

impl Config {
    /// Load config from the platform config dir.
    ///
    /// The `PORT` env var is not read here; only `serve` applies it, via
    /// [`Config::apply_port_override`].
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "zip-weather", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override the listen port with a `PORT`-style value, if one is set.
    pub fn apply_port_override(&mut self, raw: Option<&str>) -> Result<()> {
        if let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) {
            self.server.port = raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{raw}'"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        // Tomorrow's hourly data is needed for the evening forecast;
        // Open-Meteo serves at most 16 days.
        if !(2..=16).contains(&self.weather.forecast_days) {
            bail!(
                "weather.forecast_days must be between 2 and 16, got {}",
                self.weather.forecast_days
            );
        }
        if self.weather.timeout_secs == 0 {
            bail!("weather.timeout_secs must be greater than zero");
        }
        if self.weather.base_url.trim().is_empty() {
            bail!("weather.base_url must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_api() {
        let cfg = Config::default();

        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.static_dir, PathBuf::from("public"));
        assert_eq!(cfg.weather.base_url, "https://api.open-meteo.com");
        assert_eq!(cfg.weather.forecast_days, 4);
        assert_eq!(cfg.weather.unit, TemperatureUnit::Fahrenheit);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.server.port = 8080;
        cfg.weather.unit = TemperatureUnit::Celsius;
        cfg.save_to(&path).expect("save must succeed");

        let loaded = Config::load_from(&path).expect("load must succeed");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[weather]\nunit = \"celsius\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.weather.unit, TemperatureUnit::Celsius);
        assert_eq!(cfg.weather.forecast_days, 4);
        assert_eq!(cfg.server, ServerConfig::default());
    }

    #[test]
    fn invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[weather]\nforecast_days = 1\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("forecast_days must be between 2 and 16"));
    }

    #[test]
    fn port_override() {
        let mut cfg = Config::default();

        cfg.apply_port_override(None).unwrap();
        assert_eq!(cfg.server.port, 3000);

        cfg.apply_port_override(Some("  ")).unwrap();
        assert_eq!(cfg.server.port, 3000);

        cfg.apply_port_override(Some("8081")).unwrap();
        assert_eq!(cfg.server.port, 8081);

        let err = cfg.apply_port_override(Some("eighty")).unwrap_err();
        assert!(err.to_string().contains("PORT must be a port number"));
        assert_eq!(cfg.server.port, 8081);
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let mut cfg = Config::default();
        cfg.weather.timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }
}
