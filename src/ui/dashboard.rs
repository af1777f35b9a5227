//! Weather dashboard screen rendering
//!
//! Renders the single dashboard view: search box with Go button, loading and
//! error lines, the current-conditions card and the daily forecast strip.
//! Rendering is a pure function of the view state.

use chrono::{FixedOffset, Offset, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::format::{
    format_forecast_temperature, format_humidity, format_temperature, format_wind, icon_glyph,
    weekday_label,
};
use crate::app::ViewState;
use crate::data::{CurrentWeather, ForecastEntry};

/// Widest the dashboard column gets on large terminals
const MAX_WIDTH: u16 = 60;

/// Width of the Go button including borders
const GO_BUTTON_WIDTH: u16 = 6;

const PLACEHOLDER: &str = "Search city...";

/// Colors for the day and night themes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Theme {
    pub fn for_daytime(is_daytime: bool) -> Self {
        if is_daytime {
            Self {
                background: Color::Blue,
                text: Color::White,
                accent: Color::LightCyan,
                muted: Color::Gray,
            }
        } else {
            Self {
                background: Color::Black,
                text: Color::White,
                accent: Color::LightBlue,
                muted: Color::DarkGray,
            }
        }
    }
}

/// Screen regions of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    pub title: Rect,
    pub input: Rect,
    pub go_button: Rect,
    pub loading: Rect,
    pub error: Rect,
    pub card: Rect,
    pub forecast: Rect,
    pub footer: Rect,
}

/// Splits the terminal area into dashboard regions
pub fn layout(area: Rect) -> DashboardLayout {
    let width = area.width.min(MAX_WIDTH);
    let column = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1),
            Constraint::Length(3), // search
            Constraint::Length(1), // loading
            Constraint::Length(1), // error
            Constraint::Length(7), // card
            Constraint::Length(5), // forecast
            Constraint::Min(0),
            Constraint::Length(1), // footer
        ])
        .split(column);

    let search = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(GO_BUTTON_WIDTH)])
        .split(rows[2]);

    DashboardLayout {
        title: rows[0],
        input: search[0],
        go_button: search[1],
        loading: rows[3],
        error: rows[4],
        card: rows[5],
        forecast: rows[6],
        footer: rows[8],
    }
}

/// Where the Go button is drawn for a given terminal area
pub fn go_button_area(area: Rect) -> Rect {
    layout(area).go_button
}

/// Renders the dashboard
///
/// # Arguments
/// * `frame` - The ratatui Frame to render to
/// * `view` - The view state to draw
pub fn render(frame: &mut Frame, view: &ViewState) {
    let area = frame.area();
    let theme = Theme::for_daytime(view.is_daytime);
    let regions = layout(area);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.text)),
        area,
    );

    let title = Paragraph::new("Weather Dashboard")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, regions.title);

    render_search(frame, view, &regions, theme);

    if view.loading {
        let loading = Paragraph::new("Loading...")
            .style(
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::SLOW_BLINK),
            )
            .alignment(Alignment::Center);
        frame.render_widget(loading, regions.loading);
    }

    if let Some(message) = &view.error_message {
        let error = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::LightRed))
            .alignment(Alignment::Center);
        frame.render_widget(error, regions.error);
    }

    if let Some(current) = &view.current {
        render_current(frame, current, regions.card, theme);
    }

    if !view.forecast.is_empty() {
        let offset = view
            .current
            .as_ref()
            .map(CurrentWeather::utc_offset)
            .unwrap_or_else(|| Utc.fix());
        render_forecast(frame, &view.forecast, offset, regions.forecast, theme);
    }

    let footer = Paragraph::new("Enter/Go: search   Ctrl+U: clear   Esc: quit")
        .style(Style::default().fg(theme.muted))
        .alignment(Alignment::Center);
    frame.render_widget(footer, regions.footer);
}

/// Search box bound to the city input, plus the Go button
fn render_search(frame: &mut Frame, view: &ViewState, regions: &DashboardLayout, theme: Theme) {
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    let input = if view.city_input.is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, Style::default().fg(theme.muted)))
    } else {
        Paragraph::new(view.city_input.as_str())
    };
    frame.render_widget(input.block(input_block), regions.input);

    let go = Paragraph::new(Span::styled(
        "Go",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.text)),
    );
    frame.render_widget(go, regions.go_button);

    // Keep the cursor inside the box when the text is wider than it
    let inner_width = regions.input.width.saturating_sub(2);
    let typed = view.city_input.chars().count() as u16;
    let x = regions.input.x + 1 + typed.min(inner_width.saturating_sub(1));
    frame.set_cursor_position(Position::new(x, regions.input.y + 1));
}

/// Current-conditions card
fn render_current(frame: &mut Frame, current: &CurrentWeather, area: Rect, theme: Theme) {
    let lines = vec![
        Line::from(Span::styled(
            current.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw(format!("{}  ", icon_glyph(&current.icon))),
            Span::styled(
                format_temperature(current.temperature),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            current.description.clone(),
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
        Line::from(format!(
            "\u{1F4A7} {}    \u{1F4A8} {}",
            format_humidity(current.humidity),
            format_wind(current.wind_speed)
        )),
    ];

    let card = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent)),
    );
    frame.render_widget(card, area);
}

/// One cell per forecast day
fn render_forecast(
    frame: &mut Frame,
    forecast: &[ForecastEntry],
    offset: FixedOffset,
    area: Rect,
    theme: Theme,
) {
    let count = forecast.len() as u32;
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(forecast.iter().map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (entry, cell) in forecast.iter().zip(cells.iter()) {
        let lines = vec![
            Line::from(Span::styled(
                weekday_label(entry.timestamp, offset),
                Style::default().fg(theme.muted),
            )),
            Line::from(icon_glyph(&entry.icon)),
            Line::from(format_forecast_temperature(entry.temperature)),
        ];
        let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent)),
        );
        frame.render_widget(widget, *cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn paris() -> CurrentWeather {
        CurrentWeather {
            name: "Paris".to_string(),
            timestamp: 1_700_000_000,
            sunrise: 1_699_990_000,
            sunset: 1_700_030_000,
            utc_offset_secs: 0,
            temperature: 15.6,
            humidity: 70,
            wind_speed: 3.2,
            icon: "01d".to_string(),
            description: "clear sky".to_string(),
        }
    }

    fn forecast() -> Vec<ForecastEntry> {
        (0..5)
            .map(|i| ForecastEntry {
                timestamp: 1_700_000_000 + i * 86_400,
                temperature: 11.5 + i as f64,
                icon: "10d".to_string(),
            })
            .collect()
    }

    /// Renders the view and returns the buffer as one string plus the buffer itself
    fn draw(view: &ViewState) -> (String, ratatui::buffer::Buffer) {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, view)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        (content, buffer)
    }

    #[test]
    fn test_empty_view_shows_title_and_placeholder() {
        let (content, _) = draw(&ViewState::default());
        assert!(content.contains("Weather Dashboard"));
        assert!(content.contains(PLACEHOLDER));
        assert!(content.contains("Go"));
        assert!(!content.contains("Loading..."));
        assert!(!content.contains("°C"));
    }

    #[test]
    fn test_current_card_values() {
        let view = ViewState {
            current: Some(paris()),
            ..ViewState::default()
        };
        let (content, _) = draw(&view);

        assert!(content.contains("Paris"));
        assert!(content.contains("16°C"));
        assert!(content.contains("clear sky"));
        assert!(content.contains("70%"));
        assert!(content.contains("3.2 m/s"));
    }

    #[test]
    fn test_forecast_strip() {
        let view = ViewState {
            current: Some(paris()),
            forecast: forecast(),
            ..ViewState::default()
        };
        let (content, _) = draw(&view);

        // 11.5 rounds up to 12, then one degree warmer each day
        for temp in ["12°", "13°", "14°", "15°", "16°"] {
            assert!(content.contains(temp), "missing forecast temperature {temp}");
        }
        assert!(content.contains("Tue"));
        assert!(content.contains("Sat"));
    }

    #[test]
    fn test_loading_and_error_lines() {
        let view = ViewState {
            loading: true,
            error_message: Some("City not found".to_string()),
            ..ViewState::default()
        };
        let (content, _) = draw(&view);

        assert!(content.contains("Loading..."));
        assert!(content.contains("City not found"));
    }

    #[test]
    fn test_city_input_is_shown() {
        let view = ViewState {
            city_input: "Reykjavik".to_string(),
            ..ViewState::default()
        };
        let (content, _) = draw(&view);

        assert!(content.contains("Reykjavik"));
        assert!(!content.contains(PLACEHOLDER));
    }

    #[test]
    fn test_day_and_night_backgrounds() {
        let (_, day) = draw(&ViewState::default());
        assert_eq!(day.content()[0].bg, Color::Blue);

        let night_view = ViewState {
            is_daytime: false,
            ..ViewState::default()
        };
        let (_, night) = draw(&night_view);
        assert_eq!(night.content()[0].bg, Color::Black);
    }

    #[test]
    fn test_layout_centers_column_and_places_go_button_right_of_input() {
        let regions = layout(Rect::new(0, 0, 100, 30));
        assert_eq!(regions.input.x, 20);
        assert_eq!(regions.go_button.width, GO_BUTTON_WIDTH);
        assert_eq!(regions.go_button.x, regions.input.x + regions.input.width);
        assert_eq!(regions.go_button.y, regions.input.y);
        assert_eq!(go_button_area(Rect::new(0, 0, 100, 30)), regions.go_button);
    }

    #[test]
    fn test_layout_narrow_terminal() {
        let area = Rect::new(0, 0, 40, 30);
        let regions = layout(area);
        assert_eq!(regions.input.x, 0);
        assert_eq!(regions.go_button.x + regions.go_button.width, 40);
    }
}
