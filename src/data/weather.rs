//! OpenWeather API client
//!
//! This module fetches current conditions and the 5-day forecast from the
//! OpenWeather API and validates both responses before they are turned into
//! our weather data structures.

use std::fmt;

use futures::future::join;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use super::{sample_daily, Coordinates, CurrentWeather, ForecastEntry, WeatherSnapshot};

/// Base URL for the OpenWeather API
pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Unit system requested from the provider
const UNITS: &str = "metric";

/// Longest response body excerpt written to the log
const MAX_LOGGED_BODY: usize = 200;

/// Where to look up the weather
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// By position (`lat`/`lon` parameters)
    Coordinates(Coordinates),
    /// By free-text city name (`q` parameter)
    City(String),
}

impl LocationQuery {
    /// Location parameters for both endpoints
    fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Coordinates(coords) => vec![
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
            ],
            Self::City(name) => vec![("q", name.clone())],
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates(coords) => write!(f, "{},{}", coords.latitude, coords.longitude),
            Self::City(name) => f.write_str(name),
        }
    }
}

/// The two provider endpoints used by a fetch sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Self::Current => "weather",
            Self::Forecast => "forecast",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str("current conditions"),
            Self::Forecast => f.write_str("forecast"),
        }
    }
}

/// Coarse classification of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The provider could not be reached or the transfer failed
    Network,
    /// The current-conditions endpoint answered with a non-success status
    NotFound,
    /// The forecast endpoint answered with a non-success status
    Status,
    /// The body was not the JSON shape we expect
    MalformedResponse,
}

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed before a response was read
    ///
    /// The request URL is stripped, since its query carries the API key.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// Current-conditions lookup answered with a non-success status
    #[error("City not found")]
    NotFound { status: StatusCode },

    /// Any other endpoint answered with a non-success status
    #[error("Weather service error: {status}")]
    Status {
        endpoint: Endpoint,
        status: StatusCode,
    },

    /// Response body could not be decoded or lacked a required field
    #[error("Unexpected {endpoint} response: {detail}")]
    MalformedResponse { endpoint: Endpoint, detail: String },
}

impl WeatherError {
    /// Classifies the error for the view state
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Status { .. } => ErrorKind::Status,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }

    fn from_status(endpoint: Endpoint, status: StatusCode) -> Self {
        match endpoint {
            Endpoint::Current => Self::NotFound { status },
            Endpoint::Forecast => Self::Status { endpoint, status },
        }
    }

    fn malformed(endpoint: Endpoint, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint,
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.without_url())
    }
}

/// Client for fetching weather data from the OpenWeather API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Create a new WeatherClient with a default HTTP client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Create a new WeatherClient with a custom HTTP client
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: OPENWEATHER_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at a different provider base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The provider base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch current conditions and the daily forecast for a location
    ///
    /// Both requests are issued concurrently. The snapshot is returned only
    /// when both succeed; otherwise the current-conditions failure is
    /// reported ahead of the forecast one.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn fetch(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
        let (current, forecast) = join(self.fetch_current(query), self.fetch_forecast(query)).await;
        let current = current?;
        let forecast = forecast?;

        debug!(
            location = %current.name,
            forecast_days = forecast.len(),
            "weather fetched"
        );

        Ok(WeatherSnapshot { current, forecast })
    }

    /// Fetch current conditions for a location
    pub async fn fetch_current(&self, query: &LocationQuery) -> Result<CurrentWeather, WeatherError> {
        let body = self.get(Endpoint::Current, query).await?;
        let response: CurrentResponse = decode(Endpoint::Current, &body)?;
        response.into_current()
    }

    /// Fetch the forecast for a location, sampled to one entry per day
    pub async fn fetch_forecast(
        &self,
        query: &LocationQuery,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let body = self.get(Endpoint::Forecast, query).await?;
        let response: ForecastResponse = decode(Endpoint::Forecast, &body)?;
        response.into_daily_entries()
    }

    /// Issues a GET against an endpoint and returns the body of a successful response
    async fn get(&self, endpoint: Endpoint, query: &LocationQuery) -> Result<String, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());

        let mut params = query.query_params();
        params.push(("units", UNITS.to_string()));
        params.push(("appid", self.api_key.clone()));

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(
                %endpoint,
                %status,
                body = truncate_body(&body),
                "provider rejected request"
            );
            return Err(WeatherError::from_status(endpoint, status));
        }

        Ok(body)
    }
}

/// Decodes a response body, reporting failures as malformed responses
fn decode<T: serde::de::DeserializeOwned>(endpoint: Endpoint, body: &str) -> Result<T, WeatherError> {
    serde_json::from_str(body).map_err(|e| WeatherError::malformed(endpoint, e.to_string()))
}

fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(MAX_LOGGED_BODY) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}

/// OpenWeather current conditions response
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i32,
    sys: SunTimes,
    main: CurrentMain,
    wind: Wind,
    weather: Vec<Condition>,
}

impl CurrentResponse {
    fn into_current(self) -> Result<CurrentWeather, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::malformed(Endpoint::Current, "missing weather[0]"))?;
        let description = condition.description.ok_or_else(|| {
            WeatherError::malformed(Endpoint::Current, "missing weather[0].description")
        })?;

        Ok(CurrentWeather {
            name: self.name,
            timestamp: self.dt,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
            utc_offset_secs: self.timezone,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            icon: condition.icon,
            description,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SunTimes {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    icon: String,
    description: Option<String>,
}

/// OpenWeather 5-day / 3-hour forecast response
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastItem>,
}

impl ForecastResponse {
    fn into_daily_entries(self) -> Result<Vec<ForecastEntry>, WeatherError> {
        sample_daily(self.list)
            .into_iter()
            .map(ForecastItem::into_entry)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: ForecastMain,
    weather: Vec<Condition>,
}

impl ForecastItem {
    fn into_entry(self) -> Result<ForecastEntry, WeatherError> {
        let condition = self.weather.into_iter().next().ok_or_else(|| {
            WeatherError::malformed(Endpoint::Forecast, format!("missing weather[0] at dt={}", self.dt))
        })?;

        Ok(ForecastEntry {
            timestamp: self.dt,
            temperature: self.main.temp,
            icon: condition.icon,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
}
