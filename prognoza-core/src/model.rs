use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the number of forecast entries kept in a snapshot.
///
/// The upstream list has a 3-hour cadence, so five entries cover roughly the
/// next 15 hours rather than five calendar days.
pub const FORECAST_ENTRY_LIMIT: usize = 5;

/// Text used wherever upstream omits a condition description or icon.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Out-of-range values are allowed; only NaN and infinities are rejected
    /// when a request is built.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One upstream 3-hour data point after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Upstream `dt_txt`, kept verbatim.
    pub timestamp: String,
    pub icon_code: String,
    pub temperature_c: f64,
    pub description: String,
}

/// Normalized result of one forecast fetch.
///
/// Built fresh on every fetch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    current_temperature_c: f64,
    description: String,
    forecast_entries: Vec<ForecastEntry>,
}

impl WeatherSnapshot {
    /// Entries past [`FORECAST_ENTRY_LIMIT`] are dropped.
    pub fn new(
        current_temperature_c: f64,
        description: impl Into<String>,
        mut forecast_entries: Vec<ForecastEntry>,
    ) -> Self {
        forecast_entries.truncate(FORECAST_ENTRY_LIMIT);

        Self {
            current_temperature_c,
            description: description.into(),
            forecast_entries,
        }
    }

    /// Snapshot used when upstream returns an empty list.
    pub fn empty() -> Self {
        Self::new(0.0, NOT_AVAILABLE, Vec::new())
    }

    pub fn current_temperature_c(&self) -> f64 {
        self.current_temperature_c
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn forecast_entries(&self) -> &[ForecastEntry] {
        &self.forecast_entries
    }

    /// Icon for "now", taken from the first forecast entry.
    pub fn current_icon_code(&self) -> Option<&str> {
        self.forecast_entries.first().map(|e| e.icon_code.as_str())
    }
}

/// A geocoder's resolved placemark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub coordinate: Coordinate,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl Place {
    /// "name, state, country", skipping parts that are absent, blank or
    /// repeat the name.
    pub fn display_name(&self) -> String {
        let mut parts = vec![self.name.as_str()];

        for part in [self.state.as_deref(), self.country.as_deref()].into_iter().flatten() {
            if !part.is_empty() && part != self.name {
                parts.push(part);
            }
        }

        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ts: &str) -> ForecastEntry {
        ForecastEntry {
            timestamp: ts.to_string(),
            icon_code: "01d".to_string(),
            temperature_c: 10.0,
            description: "clear sky".to_string(),
        }
    }

    #[test]
    fn snapshot_truncates_to_limit() {
        let entries = (0..8).map(|i| entry(&format!("t{i}"))).collect();
        let snapshot = WeatherSnapshot::new(1.0, "x", entries);

        assert_eq!(snapshot.forecast_entries().len(), FORECAST_ENTRY_LIMIT);
        assert_eq!(snapshot.forecast_entries()[4].timestamp, "t4");
    }

    #[test]
    fn empty_snapshot_uses_defaults() {
        let snapshot = WeatherSnapshot::empty();

        assert_eq!(snapshot.current_temperature_c(), 0.0);
        assert_eq!(snapshot.description(), "N/A");
        assert!(snapshot.forecast_entries().is_empty());
        assert_eq!(snapshot.current_icon_code(), None);
    }

    #[test]
    fn coordinate_finiteness() {
        assert!(Coordinate::new(95.0, -200.0).is_finite());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_finite());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn place_display_name_skips_missing_and_duplicate_parts() {
        let mut place = Place {
            name: "Zagreb".to_string(),
            coordinate: Coordinate::new(45.81, 15.98),
            country: Some("HR".to_string()),
            state: None,
        };
        assert_eq!(place.display_name(), "Zagreb, HR");

        place.state = Some("Zagreb".to_string());
        assert_eq!(place.display_name(), "Zagreb, HR");

        place.state = Some("City of Zagreb".to_string());
        assert_eq!(place.display_name(), "Zagreb, City of Zagreb, HR");
    }
}
