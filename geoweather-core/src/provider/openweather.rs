use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{Coordinate, WeatherError};

use super::WeatherClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/data/2.5/weather?lat=..&lon=..&appid=..`
    pub fn request_url(&self, coordinate: Coordinate) -> Result<Url, WeatherError> {
        let endpoint = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CURRENT_WEATHER_PATH
        );

        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("appid", self.api_key.clone()),
            ],
        )?;

        Ok(url)
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch(&self, coordinate: Coordinate) -> Result<Vec<u8>, WeatherError> {
        let url = self.request_url(coordinate)?;
        tracing::debug!(%coordinate, "requesting current weather");

        let res = self.http.get(url).send().await?;
        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&String::from_utf8_lossy(&body)),
            });
        }

        Ok(body.to_vec())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
