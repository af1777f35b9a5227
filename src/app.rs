//! Application state management for Skycast
//!
//! This module contains the view state, keyboard and mouse handling, and the
//! reducer that applies completed fetch sequences. Network work itself runs
//! elsewhere (see `fetch`); the app only issues requests and applies results.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Position, Rect};
use tracing::{debug, warn};

use crate::data::{
    Coordinates, CurrentWeather, ForecastEntry, LocationQuery, WeatherError, WeatherSnapshot,
};
use crate::fetch::FetchMessage;

/// Error shown when the location-based lookup fails, whatever the cause
pub const LOCATION_ERROR_MESSAGE: &str = "Failed to load location weather";

/// Sequence number of a fetch sequence; only the latest one is applied
pub type FetchTicket = u64;

/// A fetch sequence the event loop should start
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub query: LocationQuery,
}

/// Everything the renderer needs to draw the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Text in the search box
    pub city_input: String,
    /// Last successfully fetched conditions
    pub current: Option<CurrentWeather>,
    /// Last successfully fetched forecast, one entry per day
    pub forecast: Vec<ForecastEntry>,
    /// Whether the latest fetch sequence is still in flight
    pub loading: bool,
    /// Message from the latest failed fetch
    pub error_message: Option<String>,
    /// Day or night theme
    pub is_daytime: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            city_input: String::new(),
            current: None,
            forecast: Vec::new(),
            loading: false,
            error_message: None,
            is_daytime: true,
        }
    }
}

/// Main application struct managing state and data
#[derive(Debug, Default)]
pub struct App {
    /// Current view state
    pub view: ViewState,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Ticket of the most recently issued fetch sequence
    latest_ticket: FetchTicket,
    /// Requests issued but not yet handed to the event loop
    pending_fetches: Vec<FetchRequest>,
}

impl App {
    /// Creates a new App instance with default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an App that searches for `city` as soon as the event loop starts
    pub fn with_initial_city(city: &str) -> Self {
        let mut app = Self::new();
        app.view.city_input = city.to_string();
        app.submit_search();
        app
    }

    /// Ticket of the most recently issued fetch sequence (0 if none yet)
    pub fn latest_ticket(&self) -> FetchTicket {
        self.latest_ticket
    }

    /// Hands over the fetch requests issued since the last call
    pub fn take_pending_fetches(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.pending_fetches)
    }

    /// Starts a coordinate-based fetch sequence
    pub fn fetch_by_coordinates(&mut self, coords: Coordinates) {
        self.begin_fetch(LocationQuery::Coordinates(coords));
    }

    /// Starts a city search from the text in the search box
    ///
    /// Blank or whitespace-only input is ignored: no request is issued and
    /// the view state is left untouched.
    pub fn submit_search(&mut self) {
        let city = self.view.city_input.trim();
        if city.is_empty() {
            return;
        }
        let query = LocationQuery::City(city.to_string());
        self.view.error_message = None;
        self.begin_fetch(query);
    }

    fn begin_fetch(&mut self, query: LocationQuery) {
        self.latest_ticket += 1;
        self.view.loading = true;
        debug!(ticket = self.latest_ticket, %query, "fetch issued");
        self.pending_fetches.push(FetchRequest {
            ticket: self.latest_ticket,
            query,
        });
    }

    /// Applies the outcome of a fetch sequence
    ///
    /// Results from superseded sequences are dropped. Returns whether the
    /// result was applied.
    pub fn apply_fetch_result(
        &mut self,
        request: &FetchRequest,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> bool {
        if request.ticket != self.latest_ticket {
            debug!(
                ticket = request.ticket,
                latest = self.latest_ticket,
                "discarding stale fetch result"
            );
            return false;
        }

        self.view.loading = false;

        match result {
            Ok(snapshot) => {
                self.view.is_daytime = snapshot.current.is_daytime();
                self.view.current = Some(snapshot.current);
                self.view.forecast = snapshot.forecast;
            }
            Err(err) => {
                warn!(query = %request.query, kind = ?err.kind(), error = %err, "fetch failed");
                let message = match request.query {
                    LocationQuery::Coordinates(_) => LOCATION_ERROR_MESSAGE.to_string(),
                    LocationQuery::City(_) => err.to_string(),
                };
                self.view.error_message = Some(message);
            }
        }

        true
    }

    /// Routes a message from a background task
    ///
    /// A position that arrives after a search was issued is ignored, so the
    /// search result is never replaced by location weather.
    pub fn handle_fetch_message(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Located(coords) if self.latest_ticket > 0 => {
                debug!(?coords, "search already issued, ignoring late location");
            }
            FetchMessage::Located(coords) => self.fetch_by_coordinates(coords),
            FetchMessage::Completed { request, result } => {
                self.apply_fetch_result(&request, result);
            }
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - Printable characters: type into the search box
    /// - `Backspace`: delete the last character
    /// - `Ctrl+U`: clear the search box
    /// - `Enter`: search for the typed city
    /// - `Esc` or `Ctrl+C`: quit the application
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

        match key_event.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
            }
            KeyCode::Char('u') if ctrl => {
                self.view.city_input.clear();
            }
            KeyCode::Enter => {
                self.submit_search();
            }
            KeyCode::Backspace => {
                self.view.city_input.pop();
            }
            KeyCode::Char(c) if !ctrl && !key_event.modifiers.contains(KeyModifiers::ALT) => {
                self.view.city_input.push(c);
            }
            _ => {}
        }
    }

    /// Handles a left click; clicking the Go button submits the search
    pub fn handle_click(&mut self, column: u16, row: u16, go_button: Rect) {
        if go_button.contains(Position::new(column, row)) {
            self.submit_search();
        }
    }
}
