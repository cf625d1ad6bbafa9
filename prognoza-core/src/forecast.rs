//! OpenWeather 5-day/3-hour forecast client.
//!
//! This is the only code that knows the forecast wire format. Every caller
//! receives the same normalized [`WeatherSnapshot`].

use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    config::{Config, ConfigError},
    error::FetchError,
    handle::FetchHandle,
    model::{Coordinate, FORECAST_ENTRY_LIMIT, ForecastEntry, NOT_AVAILABLE, WeatherSnapshot},
};

pub const DEFAULT_FORECAST_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct ForecastClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl ForecastClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_FORECAST_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Fails with [`ConfigError::MissingApiKey`] when no credential is configured.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: config.api_key()?.to_string(),
            base_url: config.forecast_url_or_default().to_string(),
            http: config.http_client()?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `{base}/forecast?lat=..&lon=..&units=metric&appid=..`
    pub fn forecast_url(&self, coordinate: Coordinate) -> Result<Url, FetchError> {
        if self.api_key.trim().is_empty() {
            return Err(FetchError::InvalidRequest("API key is empty".to_string()));
        }
        if !coordinate.is_finite() {
            return Err(FetchError::InvalidRequest(format!(
                "coordinate is not finite: {coordinate:?}"
            )));
        }

        let endpoint = format!("{}/forecast", self.base_url.trim_end_matches('/'));

        Url::parse_with_params(
            &endpoint,
            &[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("units", UNITS.to_string()),
                ("appid", self.api_key.clone()),
            ],
        )
        .map_err(|e| FetchError::InvalidRequest(format!("bad forecast endpoint {endpoint}: {e}")))
    }

    /// Issues exactly one GET and normalizes the response. Nothing is retried.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_forecast(&self, coordinate: Coordinate) -> Result<WeatherSnapshot, FetchError> {
        let url = self.forecast_url(coordinate)?;
        debug!("requesting forecast");

        let res = self.http.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            warn!("forecast request failed: {e}");
            FetchError::Transport(format!("failed to send forecast request: {e}"))
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            FetchError::Transport(format!("failed to read forecast body: {}", e.without_url()))
        })?;

        if !status.is_success() {
            warn!(%status, "forecast request rejected");
            return Err(FetchError::Transport(format!(
                "forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_forecast(&body)
    }

    /// Runs [`fetch_forecast`](Self::fetch_forecast) as a task on the current
    /// tokio runtime. Dropping the handle aborts the fetch.
    pub fn spawn_fetch(&self, coordinate: Coordinate) -> FetchHandle {
        let client = self.clone();
        FetchHandle::spawn(async move { client.fetch_forecast(coordinate).await })
    }
}

/// Parse a forecast body into a snapshot.
pub fn parse_forecast(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let parsed: OwForecastResponse = serde_json::from_str(body).map_err(|e| {
        warn!("forecast body rejected: {e}");
        FetchError::Malformed(e.to_string())
    })?;

    Ok(parsed.into_snapshot())
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

// A condition object with holes is treated like a missing one.
#[derive(Debug, Deserialize)]
struct OwWeather {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastItem {
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    dt_txt: String,
}

impl OwForecastItem {
    fn description(&self) -> String {
        self.weather
            .first()
            .and_then(|w| w.description.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    fn icon(&self) -> String {
        self.weather
            .first()
            .and_then(|w| w.icon.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastItem>,
}

impl OwForecastResponse {
    fn into_snapshot(self) -> WeatherSnapshot {
        let Some(first) = self.list.first() else {
            return WeatherSnapshot::empty();
        };

        let current_temperature_c = first.main.temp;
        let description = first.description();

        let entries = self
            .list
            .iter()
            .take(FORECAST_ENTRY_LIMIT)
            .map(|item| ForecastEntry {
                timestamp: item.dt_txt.clone(),
                icon_code: item.icon(),
                temperature_c: item.main.temp,
                description: item.description(),
            })
            .collect();

        WeatherSnapshot::new(current_temperature_c, description, entries)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
