use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use datapoint_core::{Config, Coordinate, DataPoint};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "datapoint", version, about = "Met Office DataPoint weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key and optional default location.
    Configure,

    /// Show the latest observation nearest to a location.
    Observation {
        #[command(flatten)]
        target: Target,
    },

    /// Show the three-hourly forecast nearest to a location.
    Forecast {
        #[command(flatten)]
        target: Target,

        /// How many hours ahead to show.
        #[arg(long, default_value_t = 24)]
        hours: u32,
    },
}

/// Overrides for the stored configuration.
#[derive(Debug, Args)]
pub struct Target {
    /// DataPoint API key; defaults to DATAPOINT_API_KEY or the stored key.
    #[arg(long)]
    key: Option<String>,

    /// Latitude in decimal degrees, e.g. 52.634001.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees, e.g. 1.293240.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
}

impl Target {
    fn client(&self) -> Result<DataPoint> {
        let mut config = Config::load()?;

        if let Some(key) = &self.key {
            config.set_api_key(key.clone());
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            config.set_location(Coordinate::new(lat, lon));
        }
        tracing::debug!(location = ?config.location, "target location");
        if config.location.is_none() {
            bail!(
                "No location given.\n\
                 Hint: pass --lat and --lon, or run `datapoint configure` to store a default."
            );
        }

        let mut client = DataPoint::from_config(&config)?;
        // An explicit --key wins over DATAPOINT_API_KEY.
        if let Some(key) = &self.key {
            client.set_key(key.clone());
        }
        Ok(client)
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Observation { target } => {
                let report = target.client()?.fetch_observation()?;
                let mut out = String::new();
                render::observation(&mut out, &report)?;
                print!("{out}");
                Ok(())
            }
            Command::Forecast { target, hours } => {
                let report = target.client()?.fetch_forecast()?;
                let mut out = String::new();
                render::forecast(&mut out, &report, render::slots_for_hours(hours))?;
                print!("{out}");
                Ok(())
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let prompt = if config.has_api_key() {
        "DataPoint API key (leave blank to keep the stored key):"
    } else {
        "DataPoint API key:"
    };
    let key = Password::new(prompt)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    apply_key(&mut config, &key)?;

    let save_location = Confirm::new("Store a default location?")
        .with_default(config.location.is_some())
        .prompt()
        .context("Failed to read answer")?;

    if save_location {
        let lat = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a decimal number, e.g. 52.634")
            .prompt()
            .context("Failed to read latitude")?;
        let lon = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a decimal number, e.g. 1.293")
            .prompt()
            .context("Failed to read longitude")?;
        config.set_location(Coordinate::new(lat, lon));
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Store a newly entered key. Blank input keeps an existing key.
fn apply_key(config: &mut Config, entered: &str) -> Result<()> {
    let entered = entered.trim();
    if !entered.is_empty() {
        config.set_api_key(entered.to_string());
    } else if !config.has_api_key() {
        bail!("API key must not be empty");
    }
    Ok(())
}
