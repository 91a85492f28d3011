//! JSON decoding of weather responses.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::{Forecast, WeatherError};

/// Decode a raw response body into a [`Forecast`].
///
/// Only a body that is not JSON at all, or whose top level is not an object,
/// is an error. Individual fields fall back to `None`.
pub fn decode(bytes: &[u8]) -> Result<Forecast, WeatherError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| WeatherError::Decode(e.to_string()))?;

    if !value.is_object() {
        return Err(WeatherError::Decode(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    }

    serde_json::from_value(value).map_err(|e| WeatherError::Decode(e.to_string()))
}

/// Field deserializer that turns a missing, null or mistyped value into `None`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
