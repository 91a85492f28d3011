//! Human-friendly text output.

use std::fmt::Write;

use geoweather_core::{Forecast, ForecastDisplay, WeatherError};

pub fn forecast(forecast: &Forecast) -> String {
    let display = ForecastDisplay::from(forecast);
    let mut out = String::new();

    let title = if display.city.is_empty() {
        "Unknown location"
    } else {
        display.city.as_str()
    };
    let _ = writeln!(out, "{title}");

    if let Some(temp) = &display.temperature_c {
        let _ = writeln!(out, "  Temperature: {temp}°C");
    }
    if !display.condition.is_empty() {
        let _ = writeln!(out, "  Condition:   {}", display.condition);
    }
    let _ = writeln!(out, "  Humidity:    {}", display.humidity);
    let _ = writeln!(out, "  Cloudiness:  {}", display.cloudiness);
    if let Some(wind) = &display.wind {
        let _ = writeln!(out, "  Wind:        {wind}");
    }
    if let Some(sunrise) = &display.sunrise {
        let _ = writeln!(out, "  Sunrise:     {sunrise}");
    }
    if let Some(sunset) = &display.sunset {
        let _ = writeln!(out, "  Sunset:      {sunset}");
    }
    let _ = writeln!(out, "  Timezone:    {}", display.timezone);

    out
}

pub fn failure(error: &WeatherError) -> String {
    match error.kind().prompt() {
        Some(prompt) => format!("{}: {}\n", prompt.title, prompt.message),
        None => format!("{}\n", error.user_message()),
    }
}
