//! Geocoding: free text to coordinates and coordinates to place names.
//! The concrete implementation uses the OpenWeather Geocoding API with the
//! same credential as the forecast client.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::fmt::Debug;
use tracing::{debug, instrument, warn};

use crate::{
    config::{Config, ConfigError},
    error::GeocodeError,
    model::{Coordinate, Place},
};

pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";

/// Shown when a coordinate cannot be named.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Resolve free text to the best matching placemark.
    async fn resolve_address(&self, text: &str) -> Result<Place, GeocodeError>;

    /// Resolve a coordinate to a display name.
    async fn resolve_name(&self, coordinate: Coordinate) -> Result<String, GeocodeError>;
}

/// Resolved name, or [`UNKNOWN_LOCATION`] on any failure.
pub async fn display_name_or_unknown(geocoder: &dyn Geocoder, coordinate: Coordinate) -> String {
    match geocoder.resolve_name(coordinate).await {
        Ok(name) => name,
        Err(e) => {
            debug!("reverse geocode failed: {e}");
            UNKNOWN_LOCATION.to_string()
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherGeocoder {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherGeocoder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEOCODING_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: config.api_key()?.to_string(),
            base_url: config.geocoding_url_or_default().to_string(),
            http: config.http_client()?,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url, GeocodeError> {
        if self.api_key.trim().is_empty() {
            return Err(GeocodeError::InvalidRequest("API key is empty".to_string()));
        }

        let endpoint = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let mut url = Url::parse(&endpoint)
            .map_err(|e| GeocodeError::InvalidRequest(format!("bad geocoding endpoint {endpoint}: {e}")))?;

        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("limit", "1")
            .append_pair("appid", &self.api_key);

        Ok(url)
    }

    /// First placemark in the response, if any.
    async fn lookup(&self, url: Url) -> Result<Option<Place>, GeocodeError> {
        let res = self.http.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            warn!("geocoding request failed: {e}");
            GeocodeError::Transport(format!("failed to send geocoding request: {e}"))
        })?;

        let status = res.status();
        if !status.is_success() {
            return Err(GeocodeError::Transport(format!(
                "geocoding request failed with status {status}"
            )));
        }

        let body = res.text().await.map_err(|e| {
            GeocodeError::Transport(format!("failed to read geocoding body: {}", e.without_url()))
        })?;

        let places: Vec<OwPlace> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;

        Ok(places.into_iter().next().map(Place::from))
    }
}

#[derive(Debug, Deserialize)]
struct OwPlace {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl From<OwPlace> for Place {
    fn from(p: OwPlace) -> Self {
        Place {
            name: p.name,
            coordinate: Coordinate::new(p.lat, p.lon),
            country: p.country,
            state: p.state,
        }
    }
}

#[async_trait]
impl Geocoder for OpenWeatherGeocoder {
    #[instrument(skip(self), level = "debug")]
    async fn resolve_address(&self, text: &str) -> Result<Place, GeocodeError> {
        let query = text.trim();
        if query.is_empty() {
            return Err(GeocodeError::NotFound("an empty query".to_string()));
        }

        let url = self.endpoint_url("direct", &[("q", query.to_string())])?;

        let place = self
            .lookup(url)
            .await?
            .ok_or_else(|| GeocodeError::NotFound(format!("'{query}'")))?;

        debug!(place = %place.display_name(), "resolved address");
        Ok(place)
    }

    #[instrument(skip(self), level = "debug")]
    async fn resolve_name(&self, coordinate: Coordinate) -> Result<String, GeocodeError> {
        if !coordinate.is_finite() {
            return Err(GeocodeError::InvalidRequest(format!(
                "coordinate is not finite: {coordinate:?}"
            )));
        }

        let url = self.endpoint_url(
            "reverse",
            &[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
            ],
        )?;

        let place = self
            .lookup(url)
            .await?
            .ok_or_else(|| GeocodeError::NotFound(coordinate.to_string()))?;

        Ok(place.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FailingGeocoder;

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn resolve_address(&self, text: &str) -> Result<Place, GeocodeError> {
            Err(GeocodeError::NotFound(text.to_string()))
        }

        async fn resolve_name(&self, coordinate: Coordinate) -> Result<String, GeocodeError> {
            Err(GeocodeError::NotFound(coordinate.to_string()))
        }
    }

    #[tokio::test]
    async fn unknown_location_fallback() {
        let name = display_name_or_unknown(&FailingGeocoder, Coordinate::new(0.0, 0.0)).await;
        assert_eq!(name, "Unknown Location");
    }

    #[test]
    fn endpoint_url_appends_limit_and_key() {
        let geocoder = OpenWeatherGeocoder::new("KEY").with_base_url("http://localhost:1/geo/1.0/");
        let url = geocoder
            .endpoint_url("direct", &[("q", "Novi Sad".to_string())])
            .expect("url");

        assert_eq!(url.path(), "/geo/1.0/direct");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "Novi Sad".to_string()),
                ("limit".to_string(), "1".to_string()),
                ("appid".to_string(), "KEY".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn blank_query_is_not_found_without_request() {
        let geocoder = OpenWeatherGeocoder::new("KEY").with_base_url("http://127.0.0.1:9");
        let err = geocoder.resolve_address("   ").await.unwrap_err();

        assert!(matches!(err, GeocodeError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_key_is_invalid_request() {
        let err = OpenWeatherGeocoder::new("").resolve_address("Paris").await.unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidRequest(_)));
    }
}
