//! Location resolution for the startup weather lookup
//!
//! A terminal has no geolocation API, so the position comes either from
//! coordinates given on the command line or from a single IP geolocation
//! lookup. Failures are logged and never shown to the user.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::data::Coordinates;

/// Default IP geolocation endpoint (ip-api.com JSON format)
pub const IP_API_URL: &str = "http://ip-api.com/json/";

/// Errors that can occur when resolving the user's location
#[derive(Debug, Error)]
pub enum LocationError {
    /// Location lookup was turned off
    #[error("location lookup is disabled")]
    Disabled,

    /// HTTP request to the geolocation service failed
    #[error("location request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service refused to locate us
    #[error("location lookup denied: {0}")]
    Denied(String),

    /// The service answered with something we could not read
    #[error("malformed location response: {0}")]
    Malformed(String),
}

/// Where the startup position comes from
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    /// No lookup is attempted
    Disabled,
    /// Coordinates supplied by the user
    Fixed(Coordinates),
    /// Single-shot IP geolocation against the given URL
    IpLookup { url: String },
}

impl Default for LocationSource {
    fn default() -> Self {
        Self::IpLookup {
            url: IP_API_URL.to_string(),
        }
    }
}

impl LocationSource {
    /// Resolves the current position once
    ///
    /// # Arguments
    /// * `client` - HTTP client used for the IP lookup
    ///
    /// # Returns
    /// * `Ok(Coordinates)` - The resolved position
    /// * `Err(LocationError)` - If the source is disabled or the lookup failed
    pub async fn resolve(&self, client: &Client) -> Result<Coordinates, LocationError> {
        match self {
            Self::Disabled => Err(LocationError::Disabled),
            Self::Fixed(coords) => Ok(*coords),
            Self::IpLookup { url } => {
                let response = client.get(url).send().await?.error_for_status()?;
                let text = response.text().await?;
                let coords = parse_ip_api_response(&text)?;
                debug!(
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    "location resolved by IP lookup"
                );
                Ok(coords)
            }
        }
    }
}

/// Parses an ip-api.com style body into coordinates
fn parse_ip_api_response(body: &str) -> Result<Coordinates, LocationError> {
    let response: IpApiResponse =
        serde_json::from_str(body).map_err(|e| LocationError::Malformed(e.to_string()))?;

    if response.status != "success" {
        return Err(LocationError::Denied(
            response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        ));
    }

    match (response.lat, response.lon) {
        (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
        _ => Err(LocationError::Malformed("missing lat/lon".to_string())),
    }
}

/// ip-api.com JSON response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}
