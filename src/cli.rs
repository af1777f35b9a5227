//! Command-line interface parsing for skycast
//!
//! Every option can also come from the environment (a `.env` file is loaded
//! first), so the API key never has to appear on the command line.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::weather::OPENWEATHER_BASE_URL;
use crate::data::Coordinates;
use crate::location::{LocationSource, IP_API_URL};

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Error types for CLI argument handling
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// Only one half of a coordinate pair was given
    #[error("--lat and --lon must be given together")]
    MissingCoordinate,

    /// `--once` was asked to report without a city or a location to use
    #[error("nothing to fetch: pass --city or allow location lookup")]
    NothingToFetch,

    /// A zero timeout would fail every request
    #[error("--timeout-secs must be greater than zero")]
    InvalidTimeout,
}

/// skycast - current weather and a five-day outlook in the terminal
#[derive(Parser, Debug)]
#[command(name = "skycast")]
#[command(about = "Current weather and five-day forecast dashboard")]
#[command(version)]
pub struct Cli {
    /// OpenWeather API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// Search this city on startup instead of looking up the current location
    ///
    /// Examples:
    ///   skycast --city Paris
    ///   skycast --city "New York" --once
    #[arg(long, value_name = "CITY")]
    pub city: Option<String>,

    /// Latitude to use instead of IP geolocation
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude to use instead of IP geolocation
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Skip the startup location lookup
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub no_locate: bool,

    /// Print a single plain-text report and exit
    #[arg(long)]
    pub once: bool,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Weather provider base URL
    #[arg(long, env = "SKYCAST_BASE_URL", default_value = OPENWEATHER_BASE_URL, hide = true)]
    pub base_url: String,

    /// IP geolocation endpoint
    #[arg(long, env = "SKYCAST_GEOIP_URL", default_value = IP_API_URL, hide = true)]
    pub geoip_url: String,

    /// Log file path (defaults to the user cache directory)
    #[arg(long, env = "SKYCAST_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// OpenWeather API key, possibly empty
    pub api_key: String,
    /// City to search immediately
    pub initial_city: Option<String>,
    /// Where the startup position comes from
    pub location: LocationSource,
    /// Report once and exit instead of running the dashboard
    pub once: bool,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Weather provider base URL
    pub base_url: String,
    /// Log file override
    pub log_file: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            initial_city: None,
            location: LocationSource::default(),
            once: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_url: OPENWEATHER_BASE_URL.to_string(),
            log_file: None,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// A non-blank `--city` takes over the startup fetch, so no location
    /// lookup is made alongside it.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the arguments cannot drive a session
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.timeout_secs == 0 {
            return Err(CliError::InvalidTimeout);
        }

        let initial_city = cli
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let location = match (cli.lat, cli.lon) {
            _ if initial_city.is_some() || cli.no_locate => LocationSource::Disabled,
            (Some(lat), Some(lon)) => LocationSource::Fixed(Coordinates::new(lat, lon)),
            (None, None) => LocationSource::IpLookup {
                url: cli.geoip_url.clone(),
            },
            _ => return Err(CliError::MissingCoordinate),
        };

        if cli.once && initial_city.is_none() && location == LocationSource::Disabled {
            return Err(CliError::NothingToFetch);
        }

        Ok(StartupConfig {
            api_key: cli.api_key.trim().to_string(),
            initial_city,
            location,
            once: cli.once,
            timeout: Duration::from_secs(cli.timeout_secs),
            base_url: cli.base_url.clone(),
            log_file: cli.log_file.clone(),
        })
    }
}
