use std::{io::Write, process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use geoweather_core::{
    Config, FileSettings, Forecast, IpLocationService, LastKnownLocation, LocationProvider,
    Orchestrator, WeatherError, provider::client_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geoweather", version, about = "Current weather for where you are")]
pub struct Cli {
    /// Print the raw decoded forecast as JSON instead of labels.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeather API key and location preferences.
    Configure,

    /// Show the weather at the current location.
    Now,

    /// Show the weather at a coordinate.
    Lookup {
        /// Latitude in decimal degrees, e.g. 51.5
        #[arg(allow_hyphen_values = true)]
        latitude: String,

        /// Longitude in decimal degrees, e.g. 0.12
        #[arg(allow_hyphen_values = true)]
        longitude: String,
    },

    /// Print the last known location.
    Last,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => {
                configure(config)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Now => {
                let orchestrator = build_orchestrator(&config)?;
                let result = orchestrator.refresh().await;
                let loaded = report(
                    result,
                    self.json,
                    &mut std::io::stdout(),
                    &mut std::io::stderr(),
                )?;
                Ok(exit_code(loaded))
            }
            Command::Lookup {
                latitude,
                longitude,
            } => {
                let orchestrator = build_orchestrator(&config)?;
                let result = orchestrator.manual_lookup(&latitude, &longitude).await;
                let loaded = report(
                    result,
                    self.json,
                    &mut std::io::stdout(),
                    &mut std::io::stderr(),
                )?;
                Ok(exit_code(loaded))
            }
            Command::Last => {
                let settings = open_settings()?;
                match LastKnownLocation::load(&settings) {
                    Some(coordinate) => println!("{coordinate}"),
                    None => println!("No location recorded yet."),
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    config.location.enabled = inquire::Confirm::new("Use IP geolocation for `geoweather now`?")
        .with_default(config.location.enabled)
        .prompt()
        .context("Failed to read location preference")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn open_settings() -> anyhow::Result<FileSettings> {
    let path = Config::settings_file_path()?;
    FileSettings::open(&path)
        .with_context(|| format!("Failed to open settings file: {}", path.display()))
}

fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let client = client_from_config(config)?;
    let settings = Arc::new(open_settings()?);
    let service = IpLocationService::with_lookup_url(
        config.location.enabled,
        config.location.lookup_url.clone(),
    );
    let location = LocationProvider::new(Arc::new(service), settings);

    Ok(Orchestrator::new(
        Arc::new(client),
        location,
        config.location.first_fix_timeout(),
    ))
}

/// Prints the outcome of a lookup and returns whether a forecast was shown.
///
/// A failed lookup only shows its user-facing message; the underlying error
/// goes to the debug log.
fn report(
    result: Result<Arc<Forecast>, WeatherError>,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> anyhow::Result<bool> {
    match result {
        Ok(forecast) if json => {
            writeln!(out, "{}", serde_json::to_string_pretty(forecast.as_ref())?)?;
            Ok(true)
        }
        Ok(forecast) => {
            write!(out, "{}", render::forecast(&forecast))?;
            Ok(true)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "lookup failed");
            write!(err, "{}", render::failure(&e))?;
            Ok(false)
        }
    }
}

fn exit_code(loaded: bool) -> ExitCode {
    if loaded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
