//! Approximate location from IP geolocation.
//!
//! Desktop and CLI hosts have no GPS, so this service resolves a single fix
//! from the public address via ip-api.com. It never needs a permission
//! prompt.

use reqwest::Client;
use serde::Deserialize;

use crate::Coordinate;

use super::{Authorization, EventSender, LocationEvent, LocationService};

pub const DEFAULT_LOOKUP_URL: &str = "http://ip-api.com";

#[derive(Debug, Clone)]
pub struct IpLocationService {
    enabled: bool,
    lookup_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

impl IpLocationService {
    pub fn new(enabled: bool) -> Self {
        Self::with_lookup_url(enabled, DEFAULT_LOOKUP_URL)
    }

    pub fn with_lookup_url(enabled: bool, lookup_url: impl Into<String>) -> Self {
        Self {
            enabled,
            lookup_url: lookup_url.into(),
            http: Client::new(),
        }
    }

    async fn lookup(http: Client, url: String) -> LocationEvent {
        let res = match http.get(&url).send().await {
            Ok(res) => res,
            Err(e) => return LocationEvent::Failed(format!("IP lookup request failed: {e}")),
        };

        if !res.status().is_success() {
            return LocationEvent::Failed(format!("IP lookup returned status {}", res.status()));
        }

        let body: IpApiResponse = match res.json().await {
            Ok(body) => body,
            Err(e) => return LocationEvent::Failed(format!("IP lookup parse error: {e}")),
        };

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => {
                tracing::debug!(lat, lon, city = ?body.city, "IP geolocation resolved");
                LocationEvent::Updated(vec![Coordinate::new(lat, lon)])
            }
            _ => LocationEvent::Failed(format!(
                "IP lookup {}: {}",
                body.status,
                body.message.as_deref().unwrap_or("no coordinates")
            )),
        }
    }
}

impl LocationService for IpLocationService {
    fn services_enabled(&self) -> bool {
        self.enabled
    }

    fn authorization_status(&self) -> Authorization {
        Authorization::AuthorizedWhenInUse
    }

    fn request_authorization(&self, events: EventSender) {
        let _ = events.send(LocationEvent::AuthorizationChanged(
            Authorization::AuthorizedWhenInUse,
        ));
    }

    fn start_updates(&self, events: EventSender) {
        let url = format!("{}/json", self.lookup_url.trim_end_matches('/'));
        let http = self.http.clone();

        tokio::spawn(async move {
            let event = Self::lookup(http, url).await;
            let _ = events.send(event);
        });
    }
}
