use chrono::NaiveDateTime;
use prognoza_core::{ForecastEntry, UNAVAILABLE_MESSAGE, WeatherIcon, WeatherSnapshot};
use std::fmt::Write;

/// Display unit; snapshots are always Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn from_flag(fahrenheit: bool) -> Self {
        if fahrenheit { Unit::Fahrenheit } else { Unit::Celsius }
    }

    /// Whole degrees with the unit sign.
    pub fn format(&self, celsius: f64) -> String {
        match self {
            Unit::Celsius => format!("{}°C", celsius.round() as i64),
            Unit::Fahrenheit => format!("{}°F", (celsius * 9.0 / 5.0 + 32.0).round() as i64),
        }
    }
}

/// Upstream `dt_txt` as "Mon 15:00", or verbatim when it doesn't parse.
pub fn forecast_time(timestamp: &str) -> String {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.format("%a %H:%M").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn entry_line(entry: &ForecastEntry, unit: Unit) -> String {
    format!(
        "  {:<10} {} {:<24} {:>6}",
        forecast_time(&entry.timestamp),
        WeatherIcon::from_code(&entry.icon_code).symbol(),
        capitalize(&entry.description),
        unit.format(entry.temperature_c),
    )
}

/// Title, current conditions, then one line per forecast entry.
pub fn snapshot_report(title: &str, snapshot: &WeatherSnapshot, unit: Unit) -> String {
    let mut out = String::new();
    let icon = WeatherIcon::from_code(snapshot.current_icon_code().unwrap_or_default());

    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "  {}", unit.format(snapshot.current_temperature_c()));
    let _ = writeln!(out, "  {} {}", icon.symbol(), capitalize(snapshot.description()));

    if !snapshot.forecast_entries().is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Forecast");
        for entry in snapshot.forecast_entries() {
            let _ = writeln!(out, "{}", entry_line(entry, unit));
        }
    }

    out
}

/// One favorites row: name, temperature and description, or the placeholder.
pub fn favorite_line(name: &str, snapshot: Option<&WeatherSnapshot>, unit: Unit) -> String {
    match snapshot {
        Some(s) => format!(
            "{:<20} {:>6}  {}",
            name,
            unit.format(s.current_temperature_c()),
            capitalize(s.description())
        ),
        None => format!("{name:<20} {UNAVAILABLE_MESSAGE}"),
    }
}
