use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use crate::{forecast::DEFAULT_FORECAST_BASE_URL, geocode::DEFAULT_GEOCODING_BASE_URL};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine platform config directory")]
    NoConfigDir,

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `prognoza configure` and enter your API key."
    )]
    MissingApiKey,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// OpenWeatherAPIKey = "..."
/// request_timeout_secs = 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        rename = "OpenWeatherAPIKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geocoding_base_url: Option<String>,

    /// Transport default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from the platform path, or return an empty default if it
    /// doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let toml = toml::to_string_pretty(self)?;

        fs::write(path, toml).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("dev", "prognoza", "prognoza").ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The OpenWeather credential; absent or blank keys are a startup error.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn forecast_url_or_default(&self) -> &str {
        self.forecast_base_url.as_deref().unwrap_or(DEFAULT_FORECAST_BASE_URL)
    }

    pub fn geocoding_url_or_default(&self) -> &str {
        self.geocoding_base_url.as_deref().unwrap_or(DEFAULT_GEOCODING_BASE_URL)
    }

    /// HTTP client shared by the forecast client and the geocoder.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("prognoza configure"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = Config {
            api_key: Some("   ".to_string()),
            ..Config::default()
        };

        assert!(matches!(cfg.api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn set_api_key_trims_input() {
        let mut cfg = Config::default();
        cfg.set_api_key("  KEY \n".to_string());

        assert_eq!(cfg.api_key().expect("key must exist"), "KEY");
    }

    #[test]
    fn base_urls_fall_back_to_defaults() {
        let mut cfg = Config::default();
        assert_eq!(cfg.forecast_url_or_default(), DEFAULT_FORECAST_BASE_URL);
        assert_eq!(cfg.geocoding_url_or_default(), DEFAULT_GEOCODING_BASE_URL);

        cfg.forecast_base_url = Some("http://localhost:9000".to_string());
        assert_eq!(cfg.forecast_url_or_default(), "http://localhost:9000");
    }

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parses_openweather_key_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "OpenWeatherAPIKey = \"abc123\"\nrequest_timeout_secs = 5\n")
            .expect("write");

        let cfg = Config::load_from(&path).expect("load");
        assert_eq!(cfg.api_key().expect("key"), "abc123");
        assert_eq!(cfg.request_timeout_secs, Some(5));
        assert!(cfg.forecast_base_url.is_none());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "OpenWeatherAPIKey = ").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn save_creates_directories_and_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        cfg.geocoding_base_url = Some("http://geo.local".to_string());
        cfg.save_to(&path).expect("save");

        let written = fs::read_to_string(&path).expect("read back");
        assert!(written.contains("OpenWeatherAPIKey = \"KEY\""));

        let reloaded = Config::load_from(&path).expect("reload");
        assert_eq!(reloaded, cfg);
    }
}
