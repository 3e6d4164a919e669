use crate::{
    Config, Coordinates, DailySummary, WeatherRequest,
    error::{Error, Result},
    provider::{gemini::GeminiProvider, ipinfo::IpInfoLocator, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use reqwest::Response;
use std::{convert::TryFrom, fmt::Debug};

pub mod gemini;
pub mod ipinfo;
pub mod openweather;

/// Upstream services that need an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Gemini,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Gemini => "gemini",
        }
    }

    /// Environment variable that overrides the stored key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "OWM_API_KEY",
            ProviderId::Gemini => "GEMINI_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Gemini]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "gemini" => Ok(ProviderId::Gemini),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, gemini."
            )),
        }
    }
}

/// Source of daily forecast summaries.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Fetch the forecast for `request.place` and summarize `request.date`.
    ///
    /// Fails with [`Error::NoData`] when the forecast has nothing for that date.
    async fn daily_summary(&self, request: &WeatherRequest) -> Result<DailySummary>;
}

/// Best-effort detection of the user's position.
#[async_trait]
pub trait Locator: Send + Sync + Debug {
    /// Never fails: lookup errors resolve to [`crate::DEFAULT_COORDINATES`].
    async fn locate(&self) -> Coordinates;
}

/// Generates clothing advice for a summary.
#[async_trait]
pub trait SuggestionProvider: Send + Sync + Debug {
    async fn suggest(&self, summary: &DailySummary) -> Result<String>;
}

/// The set of upstream clients a session talks to.
#[derive(Debug)]
pub struct Services {
    pub forecast: Box<dyn ForecastProvider>,
    pub locator: Box<dyn Locator>,
    pub suggestions: Box<dyn SuggestionProvider>,
}

impl Services {
    /// Build the HTTP clients from config, resolving keys from the environment first.
    pub fn from_config(config: &Config) -> Self {
        let endpoints = &config.endpoints;

        for id in ProviderId::all() {
            if config.resolve_api_key(*id).is_empty() {
                tracing::warn!(
                    provider = %id,
                    "no API key found; set {} or run `weather-wizard configure {id}`",
                    id.env_var()
                );
            }
        }

        Self {
            forecast: Box::new(OpenWeatherProvider::with_endpoint(
                config.resolve_api_key(ProviderId::OpenWeather),
                &endpoints.forecast_url,
            )),
            locator: Box::new(IpInfoLocator::with_endpoint(&endpoints.geolocation_url)),
            suggestions: Box::new(GeminiProvider::with_endpoint(
                config.resolve_api_key(ProviderId::Gemini),
                &endpoints.suggestion_base_url,
                &endpoints.suggestion_model,
            )),
        }
    }
}

/// Read the body of `res`, turning a non-2xx status into [`Error::Transport`].
pub(crate) async fn read_success_body(res: Response, service: &str) -> Result<String> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| Error::Transport(format!("Failed to read {service} response body: {e}")))?;

    if !status.is_success() {
        return Err(Error::Transport(format!(
            "{service} request failed with status {}: {}",
            status,
            truncate_body(&body),
        )));
    }

    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
