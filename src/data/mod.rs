//! Core data models for Skycast
//!
//! This module contains the data types shared by the weather client, the
//! view state and the renderers.

pub mod weather;

pub use weather::{Endpoint, ErrorKind, LocationQuery, WeatherClient, WeatherError};

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Raw forecast entries per day (the provider reports in 3-hour steps)
pub const FORECAST_STRIDE: usize = 8;

/// Base URL for provider condition icons
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// A WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Current conditions for a location, as reported by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    /// Location name (e.g. "Paris")
    pub name: String,
    /// Observation time, epoch seconds
    pub timestamp: i64,
    /// Sunrise, epoch seconds
    pub sunrise: i64,
    /// Sunset, epoch seconds
    pub sunset: i64,
    /// Offset of the location's local time from UTC, in seconds
    pub utc_offset_secs: i32,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Provider icon id (e.g. "01d")
    pub icon: String,
    /// Condition description (e.g. "clear sky")
    pub description: String,
}

impl CurrentWeather {
    /// Whether the observation time lies strictly between sunrise and sunset
    pub fn is_daytime(&self) -> bool {
        self.sunrise < self.timestamp && self.timestamp < self.sunset
    }

    /// The location's fixed UTC offset, falling back to UTC if out of range
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }
}

/// One day of the sampled forecast
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Forecast time, epoch seconds
    pub timestamp: i64,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Provider icon id
    pub icon: String,
}

impl ForecastEntry {
    /// Forecast time as a UTC datetime
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// The joined result of one fetch sequence
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastEntry>,
}

/// Icon sizes offered by the provider's image endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    /// 100x100, used for the current-conditions card
    Large,
    /// 50x50, used for forecast cells
    Small,
}

/// Builds the image URL for a provider icon id
pub fn icon_url(icon: &str, size: IconSize) -> String {
    match size {
        IconSize::Large => format!("{}/{}@2x.png", ICON_BASE_URL, icon),
        IconSize::Small => format!("{}/{}.png", ICON_BASE_URL, icon),
    }
}

/// Keeps entries 0, 8, 16, ... of a 3-hourly list, giving one per day
pub fn sample_daily<T>(entries: Vec<T>) -> Vec<T> {
    entries.into_iter().step_by(FORECAST_STRIDE).collect()
}
