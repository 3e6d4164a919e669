//! Core library for the Weather Wizard CLI.
//!
//! This crate defines:
//! - The daily forecast aggregation
//! - Configuration & credentials handling
//! - Clients for the forecast, geolocation and suggestion services
//! - Shared domain models (requests, records, summaries)
//!
//! It is used by `wizard-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod prompt;
pub mod provider;

pub use aggregate::aggregate;
pub use config::{Config, Endpoints, ProviderConfig};
pub use error::{Error, Result};
pub use model::{
    Coordinates, DEFAULT_COORDINATES, DailySummary, HourlyRecord, Place, WeatherRequest,
    kelvin_to_celsius, kelvin_to_fahrenheit,
};
pub use provider::{ForecastProvider, Locator, ProviderId, Services, SuggestionProvider};
