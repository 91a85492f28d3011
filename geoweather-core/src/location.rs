//! Location acquisition.
//!
//! A [`LocationProvider`] sits on top of a platform [`LocationService`]. It
//! walks the authorization state machine, starts updates, persists every fix
//! and hands out a [`FirstFix`] that resolves exactly once per provider.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    Coordinate, LocationError,
    settings::{LastKnownLocation, SettingsStore},
};

pub mod ip;

pub use ip::IpLocationService;

/// Authorization states reported by a platform location service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

/// Events a platform service pushes back to the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    AuthorizationChanged(Authorization),
    /// One or more fixes, most relevant first.
    Updated(Vec<Coordinate>),
    Failed(String),
}

pub type EventSender = mpsc::UnboundedSender<LocationEvent>;

/// Platform seam for device location.
///
/// Implementations must not block: anything slow happens on a task that later
/// reports through the given sender.
pub trait LocationService: Send + Sync + 'static {
    /// Whether location services are switched on at the OS level.
    fn services_enabled(&self) -> bool;

    fn authorization_status(&self) -> Authorization;

    /// Ask the user for permission. The outcome arrives as `AuthorizationChanged`.
    fn request_authorization(&self, events: EventSender);

    /// Begin continuous updates, reported as `Updated` or `Failed`.
    fn start_updates(&self, events: EventSender);
}

/// The first fix of a provider's session.
///
/// Cloning is cheap and every clone resolves to the same coordinate.
#[derive(Debug, Clone)]
pub struct FirstFix {
    rx: watch::Receiver<Option<Coordinate>>,
}

impl FirstFix {
    /// Wait for the first fix.
    ///
    /// Fails with [`LocationError::NoFix`] if the provider gave up before any
    /// fix arrived, e.g. because access was denied.
    pub async fn wait(mut self) -> Result<Coordinate, LocationError> {
        let fix = self
            .rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| LocationError::NoFix)?;
        (*fix).ok_or(LocationError::NoFix)
    }

    #[cfg(test)]
    fn get(&self) -> Option<Coordinate> {
        *self.rx.borrow()
    }
}

struct Session {
    first_fix: watch::Receiver<Option<Coordinate>>,
    driver: JoinHandle<()>,
}

pub struct LocationProvider {
    service: Arc<dyn LocationService>,
    store: Arc<dyn SettingsStore>,
    session: Mutex<Option<Session>>,
}

impl LocationProvider {
    pub fn new(service: Arc<dyn LocationService>, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            service,
            store,
            session: Mutex::new(None),
        }
    }

    /// Request access and start updates.
    ///
    /// The first call spawns the background driver; later calls return a
    /// handle to the same first fix. Must be called from within a tokio
    /// runtime.
    pub fn request_access(&self) -> Result<FirstFix, LocationError> {
        if !self.service.services_enabled() {
            tracing::debug!("location services disabled");
            return Err(LocationError::ServicesDisabled);
        }

        let mut session = self.session.lock();
        let session = session.get_or_insert_with(|| {
            let (fix_tx, fix_rx) = watch::channel(None);
            let driver = tokio::spawn(drive(
                Arc::clone(&self.service),
                Arc::clone(&self.store),
                fix_tx,
            ));
            Session {
                first_fix: fix_rx,
                driver,
            }
        });

        Ok(FirstFix {
            rx: session.first_fix.clone(),
        })
    }

    /// The most recently persisted fix, from this or any earlier session.
    pub fn last_known_location(&self) -> Option<Coordinate> {
        LastKnownLocation::load(self.store.as_ref())
    }
}

impl Drop for LocationProvider {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            session.driver.abort();
        }
    }
}

async fn drive(
    service: Arc<dyn LocationService>,
    store: Arc<dyn SettingsStore>,
    first_fix: watch::Sender<Option<Coordinate>>,
) {
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let initial = service.authorization_status();
    tracing::debug!(?initial, "location driver started");

    if events_tx
        .send(LocationEvent::AuthorizationChanged(initial))
        .is_err()
    {
        return;
    }

    while let Some(event) = events.recv().await {
        match event {
            LocationEvent::AuthorizationChanged(status) => match status {
                Authorization::NotDetermined => service.request_authorization(events_tx.clone()),
                Authorization::Restricted => {
                    tracing::warn!("location access restricted");
                    break;
                }
                Authorization::Denied => {
                    tracing::warn!("location access denied");
                    break;
                }
                Authorization::AuthorizedWhenInUse | Authorization::AuthorizedAlways => {
                    service.start_updates(events_tx.clone());
                }
            },
            LocationEvent::Updated(fixes) => {
                let Some(&fix) = fixes.first() else {
                    continue;
                };
                tracing::debug!(%fix, "location updated");

                if let Err(e) = LastKnownLocation::save(store.as_ref(), fix) {
                    tracing::warn!(error = %e, "failed to persist location");
                }

                first_fix.send_if_modified(|slot| {
                    if slot.is_none() {
                        *slot = Some(fix);
                        true
                    } else {
                        false
                    }
                });
            }
            LocationEvent::Failed(reason) => {
                tracing::warn!(%reason, "location service error");
            }
        }
    }
}
