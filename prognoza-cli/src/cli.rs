use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use prognoza_core::{
    Config, Coordinate, Favorites, ForecastClient, Geocoder, OpenWeatherGeocoder,
    display_name_or_unknown, refresh_favorites,
};
use std::path::{Path, PathBuf};

use crate::render::{self, Unit};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "prognoza", version, about = "Current weather and short forecast")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for an address.
    Show {
        /// Address or location name.
        address: String,

        /// Display temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Show weather for a coordinate, e.g. the device location.
    Here {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        #[arg(long)]
        fahrenheit: bool,
    },

    /// Show current conditions for a list of favorite locations.
    Favorites {
        /// Location names, fetched concurrently.
        #[arg(required = true)]
        addresses: Vec<String>,

        #[arg(long)]
        fahrenheit: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let config = Config::load_from(&config_path)?;

        match self.command {
            Command::Configure => configure(config, &config_path),
            Command::Show { address, fahrenheit } => {
                let (forecast, geocoder) = clients(&config)?;

                let place = geocoder
                    .resolve_address(&address)
                    .await
                    .with_context(|| format!("Could not find location '{address}'"))?;

                let snapshot = forecast
                    .fetch_forecast(place.coordinate)
                    .await
                    .with_context(|| format!("Failed to fetch weather for {}", place.display_name()))?;

                print!(
                    "{}",
                    render::snapshot_report(&place.display_name(), &snapshot, Unit::from_flag(fahrenheit))
                );
                Ok(())
            }
            Command::Here { lat, lon, fahrenheit } => {
                let (forecast, geocoder) = clients(&config)?;
                let coordinate = Coordinate::new(lat, lon);

                // The name lookup and the forecast are independent.
                let fetch = forecast.spawn_fetch(coordinate);
                let title = display_name_or_unknown(&geocoder, coordinate).await;
                let snapshot = fetch
                    .await
                    .with_context(|| format!("Failed to fetch weather for {coordinate}"))?;

                print!("{}", render::snapshot_report(&title, &snapshot, Unit::from_flag(fahrenheit)));
                Ok(())
            }
            Command::Favorites { addresses, fahrenheit } => {
                let (forecast, geocoder) = clients(&config)?;
                let unit = Unit::from_flag(fahrenheit);

                let mut favorites = Favorites::new();
                for address in addresses {
                    favorites.add(address);
                }

                let failures = refresh_favorites(&forecast, &geocoder, &mut favorites).await;
                for (name, err) in &failures {
                    tracing::info!(favorite = %name, "no data: {err}");
                }

                for name in favorites.names() {
                    println!("{}", render::favorite_line(name, favorites.snapshot(name), unit));
                }
                Ok(())
            }
        }
    }
}

fn clients(config: &Config) -> anyhow::Result<(ForecastClient, OpenWeatherGeocoder)> {
    let forecast = ForecastClient::from_config(config)?;
    let geocoder = OpenWeatherGeocoder::from_config(config)?;
    Ok((forecast, geocoder))
}

fn configure(mut config: Config, path: &Path) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save_to(path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}
