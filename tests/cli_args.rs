//! Integration tests for CLI argument handling
//!
//! Runs the binary in `--once` mode against a mock weather provider, since
//! the dashboard itself needs a real terminal.

use std::process::Output;

use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to run the CLI with given args and capture output
async fn run_cli(args: &[&str], log_dir: &TempDir) -> Output {
    Command::new(env!("CARGO_BIN_EXE_skycast"))
        .args(args)
        .env("OPENWEATHER_API_KEY", "test-key")
        .env("SKYCAST_LOG_FILE", log_dir.path().join("skycast.log"))
        .env_remove("SKYCAST_BASE_URL")
        .env_remove("SKYCAST_GEOIP_URL")
        .output()
        .await
        .expect("Failed to execute skycast")
}

fn current_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "dt": 1_700_000_000,
        "timezone": 3600,
        "sys": {"sunrise": 1_699_990_000, "sunset": 1_700_030_000},
        "main": {"temp": 15.6, "humidity": 70},
        "wind": {"speed": 3.2},
        "weather": [{"icon": "01d", "description": "clear sky"}]
    })
}

fn forecast_body() -> serde_json::Value {
    let list: Vec<serde_json::Value> = (0..40)
        .map(|i| {
            serde_json::json!({
                "dt": 1_700_000_000 + i * 10_800,
                "main": {"temp": 10.0 + i as f64 * 0.1},
                "weather": [{"icon": "04d"}]
            })
        })
        .collect();
    serde_json::json!({ "list": list })
}

async fn mount_provider(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris")))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_help_flag_exits_successfully() {
    let logs = TempDir::new().unwrap();
    let output = run_cli(&["--help"], &logs).await;
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("skycast"), "Help should mention skycast");
    assert!(stdout.contains("--city"), "Help should mention --city flag");
    assert!(
        !stdout.contains("test-key"),
        "Help must not print the API key"
    );
}

#[tokio::test]
async fn test_lat_without_lon_is_rejected() {
    let logs = TempDir::new().unwrap();
    let output = run_cli(&["--lat", "48.85"], &logs).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--lon"), "Should name the missing flag: {}", stderr);
}

#[tokio::test]
async fn test_once_with_nothing_to_fetch_fails() {
    let logs = TempDir::new().unwrap();
    let output = run_cli(&["--once", "--no-locate"], &logs).await;
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nothing to fetch"), "stderr: {}", stderr);
}

#[tokio::test]
async fn test_once_city_prints_report() {
    let server = MockServer::start().await;
    mount_provider(&server).await;
    let logs = TempDir::new().unwrap();

    let uri = server.uri();
    let output = run_cli(&["--once", "--city", "Paris", "--base-url", &uri], &logs).await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("Paris (day)"));
    assert!(stdout.contains("16°C  clear sky"));
    assert!(stdout.contains("Humidity 70%  Wind 3.2 m/s"));
    assert_eq!(stdout.matches("img/wn/04d.png").count(), 5);
    assert!(logs.path().join("skycast.log").exists());
}

#[tokio::test]
async fn test_once_unknown_city_reports_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;
    let logs = TempDir::new().unwrap();

    let uri = server.uri();
    let output = run_cli(&["--once", "--city", "Nowhere", "--base-url", &uri], &logs).await;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error: City not found"), "stdout: {}", stdout);
}

#[tokio::test]
async fn test_once_coordinates_fetch_by_position() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;
    let logs = TempDir::new().unwrap();

    let uri = server.uri();
    let output = run_cli(
        &["--once", "--lat", "48.85", "--lon", "2.35", "--base-url", &uri],
        &logs,
    )
    .await;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("Paris"));
}

#[tokio::test]
async fn test_once_coordinate_failure_uses_fixed_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let logs = TempDir::new().unwrap();

    let uri = server.uri();
    let output = run_cli(
        &["--once", "--lat", "1", "--lon", "2", "--base-url", &uri],
        &logs,
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error: Failed to load location weather"));
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use skycast::cli::{Cli, StartupConfig};
    use skycast::location::LocationSource;

    #[test]
    fn test_city_with_spaces() {
        let cli = Cli::parse_from(["skycast", "--api-key", "k", "--city", "New York"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.initial_city.as_deref(), Some("New York"));
        assert_eq!(config.location, LocationSource::Disabled);
    }

    #[test]
    fn test_timeout_override() {
        let cli = Cli::parse_from(["skycast", "--api-key", "k", "--timeout-secs", "3"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.timeout.as_secs(), 3);
    }
}
