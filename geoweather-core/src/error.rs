//! Error types shared across the core.
//!
//! Library code returns typed errors; every [`WeatherError`] collapses into
//! one of four [`ErrorKind`]s, which is all the presentation layer needs to
//! pick a message.

use std::time::Duration;

use thiserror::Error;

/// Message shown for every failure except malformed manual input.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Due to some technical reasons we are unable to load weather data";

/// Errors raised while resolving a location fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location services are disabled")]
    ServicesDisabled,

    #[error("location access is restricted")]
    Restricted,

    #[error("location access was denied")]
    Denied,

    #[error("location updates ended before a fix was received")]
    NoFix,

    #[error("no location fix within {0:?}")]
    TimedOut(Duration),
}

/// Errors from the durable settings store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is malformed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Everything that can go wrong between a trigger and a loaded forecast.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("invalid coordinate input: {0}")]
    InvalidInput(String),

    #[error("location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),

    #[error("failed to build request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode forecast: {0}")]
    Decode(String),
}

/// Coarse failure category reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InputValidation,
    LocationUnavailable,
    Transport,
    Decode,
}

/// An alert the presentation layer should show and have the user dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPrompt {
    pub title: &'static str,
    pub message: &'static str,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::InvalidInput(_) => ErrorKind::InputValidation,
            WeatherError::LocationUnavailable(_) => ErrorKind::LocationUnavailable,
            WeatherError::InvalidUrl(_)
            | WeatherError::Request(_)
            | WeatherError::Status { .. } => ErrorKind::Transport,
            WeatherError::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

impl ErrorKind {
    /// Returns the message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::InputValidation => "Please provide the right values",
            ErrorKind::LocationUnavailable | ErrorKind::Transport | ErrorKind::Decode => {
                GENERIC_FAILURE_MESSAGE
            }
        }
    }

    /// Input errors ask the user to correct something; the rest are plain errors.
    pub fn prompt(&self) -> Option<UserPrompt> {
        match self {
            ErrorKind::InputValidation => Some(UserPrompt {
                title: "Input not valid",
                message: self.user_message(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_variants_share_a_kind() {
        let url_err = WeatherError::from(url::ParseError::EmptyHost);
        let status_err = WeatherError::Status {
            status: 401,
            body: "Invalid API key".into(),
        };

        assert_eq!(url_err.kind(), ErrorKind::Transport);
        assert_eq!(status_err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn only_input_errors_have_specific_messages() {
        let input = WeatherError::InvalidInput("abc".into());
        assert_eq!(input.user_message(), "Please provide the right values");

        let others = [
            WeatherError::LocationUnavailable(LocationError::Denied),
            WeatherError::Decode("eof".into()),
            WeatherError::Status {
                status: 500,
                body: String::new(),
            },
        ];
        for err in others {
            assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn prompt_only_for_input_validation() {
        let prompt = ErrorKind::InputValidation.prompt().expect("input errors prompt");
        assert_eq!(prompt.title, "Input not valid");

        assert!(ErrorKind::Transport.prompt().is_none());
        assert!(ErrorKind::Decode.prompt().is_none());
    }

    #[test]
    fn location_error_converts() {
        let err: WeatherError = LocationError::TimedOut(Duration::from_secs(10)).into();
        assert_eq!(err.kind(), ErrorKind::LocationUnavailable);
        assert!(err.to_string().contains("within 10s"));
    }
}
