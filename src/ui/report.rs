//! Plain-text weather report for non-interactive use

use std::fmt::Write;

use super::format::{
    format_forecast_temperature, format_humidity, format_temperature, format_wind, icon_glyph,
    weekday_label,
};
use crate::app::ViewState;
use crate::data::{icon_url, IconSize};

/// Renders the view state as a plain-text report
pub fn render_report(view: &ViewState) -> String {
    let mut out = String::new();

    if let Some(message) = &view.error_message {
        let _ = writeln!(out, "Error: {}", message);
    }

    let Some(current) = &view.current else {
        if view.error_message.is_none() {
            out.push_str("No weather data\n");
        }
        return out;
    };

    let theme = if view.is_daytime { "day" } else { "night" };
    let _ = writeln!(out, "{} ({})", current.name, theme);
    let _ = writeln!(
        out,
        "{} {}  {}",
        icon_glyph(&current.icon),
        format_temperature(current.temperature),
        current.description
    );
    let _ = writeln!(
        out,
        "Humidity {}  Wind {}",
        format_humidity(current.humidity),
        format_wind(current.wind_speed)
    );
    let _ = writeln!(out, "Icon {}", icon_url(&current.icon, IconSize::Large));

    if !view.forecast.is_empty() {
        let offset = current.utc_offset();
        out.push_str("\nForecast\n");
        for entry in &view.forecast {
            let _ = writeln!(
                out,
                "{:<4}{} {:>5}  {}",
                weekday_label(entry.timestamp, offset),
                icon_glyph(&entry.icon),
                format_forecast_temperature(entry.temperature),
                icon_url(&entry.icon, IconSize::Small)
            );
        }
    }

    out
}
