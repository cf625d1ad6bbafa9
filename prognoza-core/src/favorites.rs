//! In-memory favorite locations and their latest snapshots.

use futures::future::join_all;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::{
    error::RefreshError,
    forecast::ForecastClient,
    geocode::Geocoder,
    model::WeatherSnapshot,
};

/// Favorite location names in insertion order, plus the latest snapshot
/// for each. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    names: Vec<String>,
    snapshots: HashMap<String, WeatherSnapshot>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `name` is already a favorite.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Also forgets the snapshot recorded for `name`.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.snapshots.remove(name);
        self.names.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Results for names that are no longer favorites are dropped.
    pub fn record(&mut self, name: &str, snapshot: WeatherSnapshot) -> bool {
        if !self.contains(name) {
            return false;
        }
        self.snapshots.insert(name.to_string(), snapshot);
        true
    }

    pub fn snapshot(&self, name: &str) -> Option<&WeatherSnapshot> {
        self.snapshots.get(name)
    }
}

/// Geocode and fetch every favorite concurrently, recording each success.
///
/// Returns the favorites that could not be refreshed; their previous
/// snapshots (if any) are kept.
pub async fn refresh_favorites(
    forecast: &ForecastClient,
    geocoder: &dyn Geocoder,
    favorites: &mut Favorites,
) -> Vec<(String, RefreshError)> {
    let lookups = favorites.names().iter().cloned().map(|name| async move {
        let result = fetch_for_name(forecast, geocoder, &name).await;
        (name, result)
    });

    let results = join_all(lookups).await;

    let mut failures = Vec::new();
    for (name, result) in results {
        match result {
            Ok(snapshot) => {
                favorites.record(&name, snapshot);
            }
            Err(e) => {
                warn!(favorite = %name, "refresh failed: {e}");
                failures.push((name, e));
            }
        }
    }

    info!(
        refreshed = favorites.len() - failures.len(),
        failed = failures.len(),
        "favorites refreshed"
    );
    failures
}

async fn fetch_for_name(
    forecast: &ForecastClient,
    geocoder: &dyn Geocoder,
    name: &str,
) -> Result<WeatherSnapshot, RefreshError> {
    let place = geocoder.resolve_address(name).await?;
    Ok(forecast.fetch_forecast(place.coordinate).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_duplicates_and_keeps_order() {
        let mut favs = Favorites::new();

        assert!(favs.add("Split"));
        assert!(favs.add("Osijek"));
        assert!(!favs.add("Split"));

        assert_eq!(favs.names(), ["Split".to_string(), "Osijek".to_string()]);
        assert_eq!(favs.len(), 2);
    }

    #[test]
    fn remove_drops_snapshot() {
        let mut favs = Favorites::new();
        favs.add("Split");
        assert!(favs.record("Split", WeatherSnapshot::empty()));

        assert!(favs.remove("Split"));
        assert!(favs.snapshot("Split").is_none());
        assert!(!favs.remove("Split"));
        assert!(favs.is_empty());
    }

    #[test]
    fn late_results_for_removed_names_are_ignored() {
        let mut favs = Favorites::new();
        favs.add("Rijeka");
        favs.remove("Rijeka");

        assert!(!favs.record("Rijeka", WeatherSnapshot::empty()));
        assert!(favs.snapshot("Rijeka").is_none());
    }
}
