use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    aggregate::aggregate,
    error::{Error, Result},
    model::{DailySummary, HourlyRecord, Place, WeatherRequest},
};

use super::{ForecastProvider, read_success_body};

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Client for the OpenWeather 5 day / 3 hour forecast.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_endpoint(api_key: String, endpoint: &str) -> Self {
        Self {
            api_key,
            endpoint: endpoint.to_string(),
            http: Client::new(),
        }
    }

    async fn fetch_forecast(&self, place: &Place) -> Result<OwForecastResponse> {
        let mut query: Vec<(&str, String)> = match place {
            Place::City(name) => vec![("q", name.clone())],
            Place::Coordinates(coords) => vec![
                ("lat", coords.latitude().to_string()),
                ("lon", coords.longitude().to_string()),
            ],
        };

        tracing::debug!(endpoint = %self.endpoint, ?query, "requesting OpenWeather forecast");
        query.push(("appid", self.api_key.clone()));

        let res = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                Error::Transport(format!("Failed to send request to OpenWeather: {e}"))
            })?;

        let body = read_success_body(res, "OpenWeather forecast").await?;
        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        Ok(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp_max: f64,
    temp_min: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i32,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwForecastEntry> for HourlyRecord {
    type Error = Error;

    fn try_from(entry: OwForecastEntry) -> Result<Self> {
        let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT)
            .map_err(|e| Error::DataFormat(format!("invalid dt_txt '{}': {e}", entry.dt_txt)))?;

        let condition = entry.weather.first().ok_or_else(|| {
            Error::DataFormat(format!("forecast entry {} has no weather condition", entry.dt_txt))
        })?;

        Ok(HourlyRecord {
            timestamp,
            temp_max: entry.main.temp_max,
            temp_min: entry.main.temp_min,
            feels_like: entry.main.feels_like,
            humidity: entry.main.humidity,
            condition_code: condition.id,
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn daily_summary(&self, request: &WeatherRequest) -> Result<DailySummary> {
        let forecast = self.fetch_forecast(&request.place).await?;

        let records = forecast
            .list
            .into_iter()
            .map(HourlyRecord::try_from)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            city = %forecast.city.name,
            records = records.len(),
            date = %request.date,
            "forecast received"
        );

        aggregate(&forecast.city.name, &records, request.date)
            .ok_or(Error::NoData { date: request.date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(json: serde_json::Value) -> OwForecastEntry {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn entry_converts_to_record() {
        let record = HourlyRecord::try_from(entry(serde_json::json!({
            "dt_txt": "2024-01-01 09:00:00",
            "main": { "temp_max": 290.0, "temp_min": 285.0, "feels_like": 288.0, "humidity": 60 },
            "weather": [{ "id": 800 }, { "id": 500 }]
        })))
        .unwrap();

        assert_eq!(record.timestamp.to_string(), "2024-01-01 09:00:00");
        assert_eq!(record.humidity, 60.0);
        assert_eq!(record.condition_code, 800);
    }

    #[test]
    fn bad_timestamp_is_data_format() {
        let err = HourlyRecord::try_from(entry(serde_json::json!({
            "dt_txt": "01/01/2024 09:00",
            "main": { "temp_max": 290.0, "temp_min": 285.0, "feels_like": 288.0, "humidity": 60 },
            "weather": [{ "id": 800 }]
        })))
        .unwrap_err();

        assert!(matches!(err, Error::DataFormat(msg) if msg.contains("01/01/2024")));
    }

    #[test]
    fn empty_weather_is_data_format() {
        let err = HourlyRecord::try_from(entry(serde_json::json!({
            "dt_txt": "2024-01-01 09:00:00",
            "main": { "temp_max": 290.0, "temp_min": 285.0, "feels_like": 288.0, "humidity": 60 },
            "weather": []
        })))
        .unwrap_err();

        assert!(matches!(err, Error::DataFormat(_)));
    }

    #[test]
    fn missing_main_field_fails_to_parse() {
        let result = serde_json::from_value::<OwForecastEntry>(serde_json::json!({
            "dt_txt": "2024-01-01 09:00:00",
            "main": { "temp_max": 290.0, "temp_min": 285.0, "humidity": 60 },
            "weather": [{ "id": 800 }]
        }));

        assert!(result.is_err());
    }
}
