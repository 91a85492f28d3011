//! Core library for the `geoweather` CLI.
//!
//! This crate defines:
//! - Location acquisition on top of a platform location service
//! - Durable settings (the last known location)
//! - The OpenWeather current-weather client
//! - Forecast decoding and the display values derived from it
//! - The orchestrator tying a trigger to a loaded forecast
//!
//! It is used by `geoweather-cli`, but can also back other front ends.

pub mod config;
pub mod decode;
pub mod display;
pub mod error;
pub mod location;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod settings;

pub use config::{Config, LocationConfig};
pub use decode::decode;
pub use display::ForecastDisplay;
pub use error::{ErrorKind, LocationError, StoreError, UserPrompt, WeatherError};
pub use location::{FirstFix, IpLocationService, LocationProvider, LocationService};
pub use model::{Coordinate, Forecast};
pub use orchestrator::{LoadState, Orchestrator};
pub use provider::{WeatherClient, openweather::OpenWeatherClient};
pub use settings::{FileSettings, LastKnownLocation, MemorySettings, SettingsStore};
