use serde::{Deserialize, Serialize};

use crate::{WeatherError, decode::lenient};

/// A single geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Parse a coordinate typed in by the user.
    ///
    /// Both parts must be plain non-negative decimals: digits with at most one
    /// `.`. Signs, exponents and whitespace are rejected.
    pub fn parse_manual(latitude: &str, longitude: &str) -> Result<Self, WeatherError> {
        let latitude = parse_manual_component(latitude)?;
        let longitude = parse_manual_component(longitude)?;
        Ok(Self { latitude, longitude })
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Accepts `^[0-9]*\.?[0-9]*$` strings that also parse as a float.
fn parse_manual_component(input: &str) -> Result<f64, WeatherError> {
    let only_digits_and_dots = input.chars().all(|c| c.is_ascii_digit() || c == '.');
    let dots = input.chars().filter(|&c| c == '.').count();

    if !only_digits_and_dots || dots > 1 {
        return Err(WeatherError::InvalidInput(input.to_owned()));
    }

    // "" and "." pass the character check but are not numbers.
    input
        .parse::<f64>()
        .map_err(|_| WeatherError::InvalidInput(input.to_owned()))
}

/// Current-weather response as returned by the OpenWeather `weather` endpoint.
///
/// Every field is optional and decoded leniently: a missing or mistyped field
/// becomes `None` and never fails its siblings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default, deserialize_with = "lenient")]
    pub coord: Option<GeoPoint>,
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<Vec<Condition>>,
    #[serde(default, deserialize_with = "lenient")]
    pub base: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub main: Option<MainMetrics>,
    #[serde(default, deserialize_with = "lenient")]
    pub visibility: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub wind: Option<Wind>,
    #[serde(default, deserialize_with = "lenient")]
    pub clouds: Option<Clouds>,
    #[serde(default, deserialize_with = "lenient")]
    pub dt: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub sys: Option<SystemInfo>,
    /// Offset from UTC in seconds.
    #[serde(default, deserialize_with = "lenient")]
    pub timezone: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cod: Option<i64>,
}

impl Forecast {
    /// The primary condition, i.e. the first entry of `weather`.
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.as_ref().and_then(|w| w.first())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default, deserialize_with = "lenient")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub lat: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub main: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<String>,
}

/// Temperatures are in Kelvin, pressure in hPa, humidity in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainMetrics {
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub feels_like: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub temp_max: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub pressure: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub humidity: Option<i64>,
}

/// Speed in m/s, direction in degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default, deserialize_with = "lenient")]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub deg: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    #[serde(default, deserialize_with = "lenient")]
    pub all: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub country: Option<String>,
    /// Unix epoch seconds.
    #[serde(default, deserialize_with = "lenient")]
    pub sunrise: Option<f64>,
    /// Unix epoch seconds.
    #[serde(default, deserialize_with = "lenient")]
    pub sunset: Option<f64>,
}
