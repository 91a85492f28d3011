use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, Coordinate, WeatherError, provider::openweather::OpenWeatherClient};

pub mod openweather;

/// Fetches the raw current-weather payload for a coordinate.
///
/// One call is one request: no retries and no caching.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch(&self, coordinate: Coordinate) -> Result<Vec<u8>, WeatherError>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key()?;

    let client = match config.base_url.as_deref() {
        Some(base_url) => OpenWeatherClient::with_base_url(api_key.to_owned(), base_url),
        None => OpenWeatherClient::new(api_key.to_owned()),
    };

    Ok(client)
}
