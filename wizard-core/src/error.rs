use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by forecast fetching, geolocation and suggestions.
#[derive(Debug, Error)]
pub enum Error {
    /// Network failure or a non-2xx response from an upstream API.
    #[error("{0}")]
    Transport(String),

    /// The upstream JSON was missing fields or had values we could not read.
    #[error("Malformed response: {0}")]
    DataFormat(String),

    /// User-supplied input was rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The forecast contained no hourly records for the requested date.
    #[error("No forecast data available for {date}")]
    NoData { date: NaiveDate },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::DataFormat(err.to_string())
    }
}
