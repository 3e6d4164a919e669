use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::provider::ProviderId;

/// Credentials for a single provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Upstream URLs. Every field falls back to the public service when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: String,

    /// Base of the `generateContent` route, without the model segment.
    #[serde(default = "default_suggestion_base_url")]
    pub suggestion_base_url: String,

    #[serde(default = "default_suggestion_model")]
    pub suggestion_model: String,
}

fn default_forecast_url() -> String {
    "https://api.openweathermap.org/data/2.5/forecast".to_string()
}

fn default_geolocation_url() -> String {
    "https://ipinfo.io/json".to_string()
}

fn default_suggestion_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_suggestion_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            geolocation_url: default_geolocation_url(),
            suggestion_base_url: default_suggestion_base_url(),
            suggestion_model: default_suggestion_model(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

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
        let dirs = ProjectDirs::from("dev", "weather-wizard", "weather-wizard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace the stored API key for a provider.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });
    }

    /// Returns the API key stored in the file for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    /// Key used for requests: environment first, then the file, else empty.
    ///
    /// An empty key is passed through; the upstream API rejects it.
    pub fn resolve_api_key(&self, provider_id: ProviderId) -> String {
        self.resolve_api_key_with(provider_id, std::env::var(provider_id.env_var()).ok())
    }

    fn resolve_api_key_with(&self, provider_id: ProviderId, from_env: Option<String>) -> String {
        from_env
            .filter(|key| !key.is_empty())
            .or_else(|| self.provider_api_key(provider_id).map(str::to_owned))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn set_api_key_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        let key = cfg.provider_api_key(ProviderId::OpenWeather);
        assert_eq!(key, Some("OPEN_KEY"));
        assert_eq!(cfg.provider_api_key(ProviderId::Gemini), None);
    }

    #[test]
    fn upsert_replaces_existing_key() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::Gemini, "OLD".into());
        cfg.upsert_provider_api_key(ProviderId::Gemini, "NEW".into());

        assert_eq!(cfg.provider_api_key(ProviderId::Gemini), Some("NEW"));
    }

    #[test]
    fn environment_wins_over_file() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "FILE_KEY".into());

        let key = cfg.resolve_api_key_with(ProviderId::OpenWeather, Some("ENV_KEY".into()));
        assert_eq!(key, "ENV_KEY");
    }

    #[test]
    fn empty_environment_falls_back_to_file() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "FILE_KEY".into());

        let key = cfg.resolve_api_key_with(ProviderId::OpenWeather, Some(String::new()));
        assert_eq!(key, "FILE_KEY");
    }

    #[test]
    fn missing_key_resolves_to_empty() {
        let cfg = Config::default();
        assert_eq!(cfg.resolve_api_key_with(ProviderId::Gemini, None), "");
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();

        assert!(cfg.providers.is_empty());
        assert_eq!(cfg.endpoints, Endpoints::default());
    }

    #[test]
    fn save_then_load_keeps_keys_and_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        cfg.endpoints.suggestion_model = "gemini-2.0-flash".into();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.provider_api_key(ProviderId::OpenWeather), Some("OPEN_KEY"));
        assert_eq!(loaded.endpoints.suggestion_model, "gemini-2.0-flash");
    }

    #[test]
    fn partial_endpoints_use_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [endpoints]
            forecast_url = "http://localhost:9000/forecast"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.endpoints.forecast_url, "http://localhost:9000/forecast");
        assert_eq!(cfg.endpoints.geolocation_url, "https://ipinfo.io/json");
        assert_eq!(cfg.endpoints.suggestion_model, "gemini-1.5-flash");
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "providers = 3").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
