use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::Units;

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "WEATHER_LOOKUP_API_KEY";

/// Service base URLs. Overridable so tests can point at a local server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_geo_url")]
    pub geo_url: String,
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geo_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather_url: default_weather_url(),
            geo_url: default_geo_url(),
        }
    }
}

/// Suggestion lookup tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Quiet period after the last keystroke, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Shorter input clears suggestions without a lookup.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    #[serde(default = "default_limit")]
    pub limit: u8,
}

const fn default_debounce_ms() -> u64 {
    300
}

const fn default_min_chars() -> usize {
    2
}

const fn default_limit() -> u8 {
    5
}

impl SuggestConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_chars: default_min_chars(),
            limit: default_limit(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// default_city = "London"
///
/// [suggest]
/// debounce_ms = 300
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default)]
    pub units: Units,

    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub endpoints: Endpoints,

    #[serde(default)]
    pub suggest: SuggestConfig,
}

fn default_city() -> String {
    "London".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: Units::default(),
            default_city: default_city(),
            timeout_secs: default_timeout_secs(),
            endpoints: Endpoints::default(),
            suggest: SuggestConfig::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file yet.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).with_context(|| {
            format!("Failed to read config file: {}", path.display())
        })?;

        Self::from_toml(&contents).with_context(|| {
            format!("Failed to parse config file: {}", path.display())
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml).with_context(|| {
            format!("Failed to write config file: {}", path.display())
        })?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-lookup", "weather-lookup")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key from the environment, falling back to the stored one.
    pub fn resolve_api_key(&self) -> Result<String> {
        Self::pick_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    fn pick_api_key(from_env: Option<String>, stored: Option<&str>) -> Result<String> {
        from_env
            .filter(|key| !key.trim().is_empty())
            .or_else(|| stored.map(str::to_owned))
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `weather-lookup configure` or set {API_KEY_ENV}."
                )
            })
    }
}
