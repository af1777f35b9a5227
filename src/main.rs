//! skycast - terminal weather dashboard
//!
//! Shows current conditions and a five-day outlook for the current location
//! or a searched city, using the OpenWeather API.

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{info, warn};

use skycast::app::App;
use skycast::cli::{Cli, StartupConfig};
use skycast::data::WeatherClient;
use skycast::fetch::{self, build_http_client, FetchHandle};
use skycast::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Runs a single fetch sequence and prints a plain-text report
///
/// Returns whether weather was shown without an error.
async fn run_once(
    config: &StartupConfig,
    client: &WeatherClient,
    http: &reqwest::Client,
) -> bool {
    let mut app = match &config.initial_city {
        Some(city) => App::with_initial_city(city),
        None => {
            let mut app = App::new();
            match config.location.resolve(http).await {
                Ok(coords) => app.fetch_by_coordinates(coords),
                Err(e) => warn!(error = %e, "location unavailable"),
            }
            app
        }
    };

    for request in app.take_pending_fetches() {
        let message = fetch::run_fetch(client, request).await;
        app.handle_fetch_message(message);
    }

    print!("{}", ui::render_report(&app.view));
    app.view.current.is_some() && app.view.error_message.is_none()
}

/// Runs the interactive dashboard until the user quits
async fn run_dashboard(
    config: &StartupConfig,
    client: WeatherClient,
    http: reqwest::Client,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut handle = FetchHandle::new(client);
    let mut app = match &config.initial_city {
        Some(city) => App::with_initial_city(city),
        None => {
            handle.spawn_locate(config.location.clone(), http);
            App::new()
        }
    };

    let mut area = Rect::default();

    // Main event loop
    loop {
        for request in app.take_pending_fetches() {
            handle.spawn_fetch(request);
        }

        // Render UI
        terminal.draw(|f| {
            area = f.area();
            ui::render(f, &app.view);
        })?;

        // Apply settled background work
        while let Some(message) = fetch::try_recv(&mut handle) {
            app.handle_fetch_message(message);
        }

        // Poll for input events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => app.handle_click(column, row, ui::go_button_area(area)),
                _ => {}
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    match logging::init(config.log_file.clone()) {
        Ok(Some(path)) => info!(path = %path.display(), "skycast starting"),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: logging disabled: {}", e),
    }
    if config.api_key.is_empty() {
        warn!("OPENWEATHER_API_KEY is not set, requests will be rejected");
    }

    let http = build_http_client(config.timeout)?;
    let client = WeatherClient::with_client(http.clone(), config.api_key.clone())
        .with_base_url(&config.base_url);

    if config.once {
        if !run_once(&config, &client, &http).await {
            process::exit(1);
        }
        return Ok(());
    }

    run_dashboard(&config, client, http).await
}
