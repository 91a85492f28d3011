//! Display values derived from a decoded [`Forecast`].
//!
//! Every function here is pure. Fallbacks differ per field on purpose:
//! temperature falls back to 0 K, wind speed to 1 m/s, the timezone label to a
//! 1 second offset, and sunrise/sunset to epoch 0.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::{Forecast, model::SystemInfo};

const KELVIN_OFFSET: f64 = 273.0;
const CLOCK_FORMAT: &str = "%I:%M %p";

/// Whole degrees Celsius, `floor(kelvin - 273)`. Missing input counts as 0 K.
pub fn celsius(kelvin: Option<f64>) -> i64 {
    (kelvin.unwrap_or(0.0) - KELVIN_OFFSET).floor() as i64
}

/// Wind speed in km/h, `ceil(m_s * 3600 / 1000)`. Missing input counts as 1 m/s.
pub fn wind_kmh(meters_per_second: Option<f64>) -> i64 {
    (meters_per_second.unwrap_or(1.0) * 3600.0 / 1000.0).ceil() as i64
}

/// Formats epoch seconds as a wall-clock time at the given UTC offset.
///
/// A missing timestamp formats as epoch 0, so a payload without sunrise still
/// shows a (meaningless) time rather than nothing.
pub fn clock_time(epoch_seconds: Option<f64>, utc_offset_seconds: i64) -> String {
    let secs = epoch_seconds.unwrap_or(0.0).floor() as i64;
    let instant = DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();
    let offset = i32::try_from(utc_offset_seconds)
        .ok()
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());

    instant.with_timezone(&offset).format(CLOCK_FORMAT).to_string()
}

/// `"<value>%"`, with a missing value shown as 0.
pub fn percent(value: Option<i64>) -> String {
    format!("{}%", value.unwrap_or(0))
}

/// `"GMT <hours>"` for an offset in seconds, printed at single precision.
/// A missing offset counts as 1 second.
pub fn timezone_label(utc_offset_seconds: Option<i64>) -> String {
    format!("GMT {}", utc_offset_seconds.unwrap_or(1) as f32 / 3600.0)
}

impl SystemInfo {
    pub fn sunrise_display(&self, utc_offset_seconds: i64) -> String {
        clock_time(self.sunrise, utc_offset_seconds)
    }

    pub fn sunset_display(&self, utc_offset_seconds: i64) -> String {
        clock_time(self.sunset, utc_offset_seconds)
    }
}

/// Every label the forecast screen shows.
///
/// Optional labels are `None` when their whole source block is absent from
/// the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastDisplay {
    pub city: String,
    pub temperature_c: Option<String>,
    pub condition: String,
    pub humidity: String,
    pub cloudiness: String,
    pub wind: Option<String>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub timezone: String,
}

impl From<&Forecast> for ForecastDisplay {
    fn from(forecast: &Forecast) -> Self {
        let offset = forecast.timezone.unwrap_or(0);
        let main = forecast.main.as_ref();

        Self {
            city: forecast.name.clone().unwrap_or_default(),
            temperature_c: main.map(|m| celsius(m.temp).to_string()),
            condition: forecast
                .condition()
                .and_then(|c| c.description.clone())
                .unwrap_or_default(),
            humidity: percent(main.and_then(|m| m.humidity)),
            cloudiness: percent(forecast.clouds.as_ref().and_then(|c| c.all)),
            wind: forecast.wind.as_ref().map(|w| {
                format!("{} km/h at {}°", wind_kmh(w.speed), w.deg.unwrap_or(0))
            }),
            sunrise: forecast.sys.as_ref().map(|s| s.sunrise_display(offset)),
            sunset: forecast.sys.as_ref().map(|s| s.sunset_display(offset)),
            timezone: timezone_label(forecast.timezone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;

    #[test]
    fn celsius_is_floor_of_kelvin_minus_273() {
        for kelvin in [0.0, 1.5, 250.0, 273.0, 273.9, 288.15, 300.0, 310.99] {
            let expected = (kelvin - 273.0_f64).floor() as i64;
            assert_eq!(celsius(Some(kelvin)), expected, "kelvin = {kelvin}");
        }
        assert_eq!(celsius(Some(300.0)), 27);
        assert_eq!(celsius(Some(272.5)), -1);
    }

    #[test]
    fn celsius_of_missing_temperature() {
        assert_eq!(celsius(None), -273);
    }

    #[test]
    fn wind_kmh_rounds_up() {
        for speed in [0.0, 0.3, 1.0, 4.1, 10.0, 33.3] {
            let expected = (speed * 3600.0_f64 / 1000.0).ceil() as i64;
            assert_eq!(wind_kmh(Some(speed)), expected, "speed = {speed}");
        }
        assert_eq!(wind_kmh(Some(0.3)), 2);
        assert_eq!(wind_kmh(Some(10.0)), 36);
    }

    #[test]
    fn wind_kmh_of_missing_speed_uses_one_meter_per_second() {
        assert_eq!(wind_kmh(None), 4);
    }

    #[test]
    fn clock_time_respects_offset() {
        assert_eq!(clock_time(Some(1710828060.0), 0), "06:01 AM");
        assert_eq!(clock_time(Some(1710871740.0), 0), "06:09 PM");
        assert_eq!(clock_time(Some(1710828060.0), 19800), "11:31 AM");
    }

    #[test]
    fn clock_time_of_missing_timestamp_is_epoch() {
        assert_eq!(clock_time(None, 0), "12:00 AM");
    }

    #[test]
    fn clock_time_ignores_impossible_offset() {
        assert_eq!(clock_time(Some(0.0), 1_000_000), "12:00 AM");
    }

    #[test]
    fn percent_defaults_to_zero() {
        assert_eq!(percent(Some(81)), "81%");
        assert_eq!(percent(None), "0%");
    }

    #[test]
    fn timezone_label_in_hours() {
        assert_eq!(timezone_label(Some(0)), "GMT 0");
        assert_eq!(timezone_label(Some(3600)), "GMT 1");
        assert_eq!(timezone_label(Some(19800)), "GMT 5.5");
        assert_eq!(timezone_label(Some(-18000)), "GMT -5");
    }

    #[test]
    fn timezone_label_fallback_is_one_second() {
        assert_eq!(timezone_label(None), "GMT 0.00027777778");
    }

    #[test]
    fn display_for_full_fixture() {
        let body = br#"{
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
            "main": {"temp": 300.0, "humidity": 81},
            "wind": {"speed": 4.1, "deg": 80},
            "clouds": {"all": 75},
            "sys": {"country": "GB", "sunrise": 1710828060, "sunset": 1710871740},
            "timezone": 0,
            "name": "London"
        }"#;
        let forecast = decode(body).expect("fixture decodes");
        let display = ForecastDisplay::from(&forecast);

        assert_eq!(
            display,
            ForecastDisplay {
                city: "London".into(),
                temperature_c: Some("27".into()),
                condition: "broken clouds".into(),
                humidity: "81%".into(),
                cloudiness: "75%".into(),
                wind: Some("15 km/h at 80°".into()),
                sunrise: Some("06:01 AM".into()),
                sunset: Some("06:09 PM".into()),
                timezone: "GMT 0".into(),
            }
        );
    }

    #[test]
    fn display_without_wind_sys_and_clouds() {
        let body = br#"{"main": {"temp": 290.2}, "name": "Oslo", "timezone": 3600}"#;
        let forecast = decode(body).expect("partial payload decodes");
        let display = ForecastDisplay::from(&forecast);

        assert_eq!(display.temperature_c.as_deref(), Some("17"));
        assert_eq!(display.humidity, "0%");
        assert_eq!(display.cloudiness, "0%");
        assert_eq!(display.wind, None);
        assert_eq!(display.sunrise, None);
        assert_eq!(display.sunset, None);
        assert_eq!(display.condition, "");
    }

    #[test]
    fn empty_blocks_use_field_fallbacks() {
        let body = br#"{"main": {}, "wind": {}, "sys": {}}"#;
        let display = ForecastDisplay::from(&decode(body).expect("decodes"));

        assert_eq!(display.temperature_c.as_deref(), Some("-273"));
        assert_eq!(display.wind.as_deref(), Some("4 km/h at 0°"));
        assert_eq!(display.sunrise.as_deref(), Some("12:00 AM"));
        assert_eq!(display.timezone, "GMT 0.00027777778");
    }
}
