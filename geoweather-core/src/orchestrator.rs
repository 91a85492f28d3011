//! Sequencing of a weather lookup, from trigger to loaded forecast.
//!
//! Two triggers exist: [`Orchestrator::refresh`] resolves the device location
//! first, [`Orchestrator::manual_lookup`] validates typed-in coordinates
//! instead. Both then fetch and decode. Progress is published as a
//! [`LoadState`] on a watch channel; the presentation layer subscribes or
//! polls.

use std::{sync::Arc, time::Duration};

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::{
    Coordinate, ErrorKind, Forecast, LocationError, WeatherError, decode,
    location::LocationProvider, provider::WeatherClient,
};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    AwaitingLocation,
    ValidatingInput,
    Fetching,
    Loaded(Arc<Forecast>),
    Failed(ErrorKind),
}

#[cfg(test)]
impl LoadState {
    fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Loaded(_) | LoadState::Failed(_))
    }
}

pub struct Orchestrator {
    client: Arc<dyn WeatherClient>,
    location: LocationProvider,
    first_fix_timeout: Duration,
    state: watch::Sender<LoadState>,
    forecast: RwLock<Option<Arc<Forecast>>>,
    #[cfg(test)]
    transitions: parking_lot::Mutex<Vec<LoadState>>,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn WeatherClient>,
        location: LocationProvider,
        first_fix_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);

        Self {
            client,
            location,
            first_fix_timeout,
            state,
            forecast: RwLock::new(None),
            #[cfg(test)]
            transitions: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// The last successfully loaded forecast. A failed lookup does not clear it.
    pub fn forecast(&self) -> Option<Arc<Forecast>> {
        self.forecast.read().clone()
    }

    /// Look up the weather at the device location.
    pub async fn refresh(&self) -> Result<Arc<Forecast>, WeatherError> {
        self.publish(LoadState::AwaitingLocation);

        let coordinate = match self.resolve_location().await {
            Ok(coordinate) => coordinate,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.fetch(coordinate).await
    }

    /// Look up the weather at a coordinate typed in by the user.
    ///
    /// Invalid input fails before any request is made.
    pub async fn manual_lookup(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<Arc<Forecast>, WeatherError> {
        self.publish(LoadState::ValidatingInput);

        let coordinate = match Coordinate::parse_manual(latitude, longitude) {
            Ok(coordinate) => coordinate,
            Err(e) => return Err(self.fail(e)),
        };

        self.fetch(coordinate).await
    }

    /// First fix of this session, falling back to the last persisted fix.
    async fn resolve_location(&self) -> Result<Coordinate, LocationError> {
        let first_fix = match self.location.request_access() {
            Ok(first_fix) => match tokio::time::timeout(self.first_fix_timeout, first_fix.wait())
                .await
            {
                Ok(result) => result,
                Err(_) => Err(LocationError::TimedOut(self.first_fix_timeout)),
            },
            Err(e) => Err(e),
        };

        match first_fix {
            Ok(coordinate) => Ok(coordinate),
            Err(e) => match self.location.last_known_location() {
                Some(last) => {
                    tracing::info!(error = %e, %last, "no fresh fix, using last known location");
                    Ok(last)
                }
                None => Err(e),
            },
        }
    }

    async fn fetch(&self, coordinate: Coordinate) -> Result<Arc<Forecast>, WeatherError> {
        self.publish(LoadState::Fetching);

        let body = match self.client.fetch(coordinate).await {
            Ok(body) => body,
            Err(e) => return Err(self.fail(e)),
        };

        let forecast = match decode(&body) {
            Ok(forecast) => Arc::new(forecast),
            Err(e) => return Err(self.fail(e)),
        };

        tracing::debug!(%coordinate, name = ?forecast.name, "forecast loaded");
        *self.forecast.write() = Some(Arc::clone(&forecast));
        self.publish(LoadState::Loaded(Arc::clone(&forecast)));

        Ok(forecast)
    }

    fn fail(&self, error: WeatherError) -> WeatherError {
        tracing::warn!(error = %error, kind = ?error.kind(), "weather lookup failed");
        self.publish(LoadState::Failed(error.kind()));
        error
    }

    fn publish(&self, state: LoadState) {
        #[cfg(test)]
        self.transitions.lock().push(state.clone());

        // Works with zero subscribers, so a dismissed screen is harmless.
        self.state.send_replace(state);
    }
}
