use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fallback used when IP geolocation fails (Bern, Switzerland).
pub const DEFAULT_COORDINATES: Coordinates = Coordinates {
    latitude: 46.947975,
    longitude: 7.447447,
};

/// Offset between the Kelvin and Celsius scales.
const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    kelvin_to_celsius(kelvin) * 9.0 / 5.0 + 32.0
}

/// A latitude/longitude pair that is known to be within range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;
    pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

    /// Validate and build coordinates. Bounds are inclusive.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !Self::LATITUDE_RANGE.contains(&latitude) {
            return Err(Error::Validation(format!(
                "Latitude {latitude} is out of range (-90 to 90)"
            )));
        }
        if !Self::LONGITUDE_RANGE.contains(&longitude) {
            return Err(Error::Validation(format!(
                "Longitude {longitude} is out of range (-180 to 180)"
            )));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Where to look up the forecast.
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    City(String),
    Coordinates(Coordinates),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRequest {
    pub place: Place,
    pub date: NaiveDate,
}

/// One 3-hour entry of the provider's forecast list. Temperatures are Kelvin.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub timestamp: NaiveDateTime,
    pub temp_max: f64,
    pub temp_min: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub condition_code: i32,
}

impl HourlyRecord {
    /// Condition codes below 700 are rain, drizzle, thunderstorm or snow.
    pub fn is_precipitation(&self) -> bool {
        self.condition_code < 700
    }
}

/// Aggregate of every hourly record on one date. Temperatures are Kelvin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub city: String,
    pub date: NaiveDate,
    pub will_rain: bool,
    pub max_temp: f64,
    pub min_temp: f64,
    pub feels_like: f64,
    pub avg_humidity: f64,
}

fn write_temperature(f: &mut fmt::Formatter<'_>, label: &str, kelvin: f64) -> fmt::Result {
    writeln!(
        f,
        "- {label}: {:.2}°C / {:.2}°F",
        kelvin_to_celsius(kelvin),
        kelvin_to_fahrenheit(kelvin)
    )
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weather in {} on {}:", self.city, self.date)?;
        write_temperature(f, "Max Temp", self.max_temp)?;
        write_temperature(f, "Feels Like", self.feels_like)?;
        write_temperature(f, "Min Temp", self.min_temp)?;
        writeln!(f, "- Avg Humidity: {:.2}%", self.avg_humidity)?;

        if self.will_rain {
            writeln!(f, "Rain expected! Bring an umbrella!")
        } else {
            writeln!(f, "No rain expected!")
        }
    }
}
