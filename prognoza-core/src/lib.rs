//! Core library for the Prognoza weather client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The forecast fetch-and-normalize client
//! - The geocoding contract and an OpenWeather implementation
//! - Shared domain models (coordinates, snapshots, places)
//!
//! It is used by `prognoza-cli`, but any front end can drive it the same way:
//! obtain a [`Coordinate`], call [`ForecastClient::fetch_forecast`], render the
//! resulting [`WeatherSnapshot`].

pub mod config;
pub mod error;
pub mod favorites;
pub mod forecast;
pub mod geocode;
pub mod handle;
pub mod icon;
pub mod model;

pub use config::{Config, ConfigError};
pub use error::{FetchError, GeocodeError, RefreshError, UNAVAILABLE_MESSAGE};
pub use favorites::{Favorites, refresh_favorites};
pub use forecast::ForecastClient;
pub use geocode::{Geocoder, OpenWeatherGeocoder, UNKNOWN_LOCATION, display_name_or_unknown};
pub use handle::FetchHandle;
pub use icon::{WeatherIcon, icon_url};
pub use model::{Coordinate, FORECAST_ENTRY_LIMIT, ForecastEntry, Place, WeatherSnapshot};
