//! Display formatting shared by the dashboard and the plain-text report

use chrono::{DateTime, FixedOffset};

/// Rounds half-way values up (`-2.5` becomes `-2`, `15.5` becomes `16`)
///
/// Returns `None` for NaN and infinities.
pub fn round_half_up(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    // Comparing the fraction avoids the `value + 0.5` carry on 0.49999999999999994
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    Some(rounded as i64)
}

fn rounded_or_dashes(celsius: f64) -> String {
    round_half_up(celsius)
        .map(|t| t.to_string())
        .unwrap_or_else(|| "--".to_string())
}

/// Current temperature, e.g. "16°C"
pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", rounded_or_dashes(celsius))
}

/// Forecast temperature, e.g. "16°"
pub fn format_forecast_temperature(celsius: f64) -> String {
    format!("{}°", rounded_or_dashes(celsius))
}

/// Relative humidity, e.g. "70%"
pub fn format_humidity(percent: u8) -> String {
    format!("{}%", percent)
}

/// Wind speed as reported, e.g. "3.2 m/s"
pub fn format_wind(speed: f64) -> String {
    format!("{} m/s", speed)
}

/// Short weekday name of a timestamp in the location's time zone
pub fn weekday_label(timestamp: i64, offset: FixedOffset) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.with_timezone(&offset).format("%a").to_string())
        .unwrap_or_default()
}

/// Provider icon id to terminal glyph
///
/// Icon ids are a two-digit condition group followed by `d` (day) or `n`
/// (night), see <https://openweathermap.org/weather-conditions>.
pub fn icon_glyph(icon: &str) -> &'static str {
    let night = icon.ends_with('n');
    match icon.get(..2) {
        Some("01") if night => "\u{1F319}", // 🌙
        Some("01") => "\u{2600}",           // ☀
        Some("02") => "\u{26C5}",           // ⛅
        Some("03") | Some("04") => "\u{2601}", // ☁
        Some("09") => "\u{1F326}",          // 🌦
        Some("10") => "\u{1F327}",          // 🌧
        Some("11") => "\u{26C8}",           // ⛈
        Some("13") => "\u{2744}",           // ❄
        Some("50") => "\u{1F32B}",          // 🌫
        _ => "?",
    }
}
