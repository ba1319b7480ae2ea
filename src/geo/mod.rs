//! Geocoding module
//!
//! Reverse geocoding (coordinates to address) for newly placed stops and
//! forward search (text to candidates) for the search overlay.
//!
//! [`GeocodeClient`] is the only thing the route builder talks to. It never
//! fails: when the backend errors, times out, or finds nothing, it hands back
//! a synthesized address so stop creation is never blocked.

pub mod mapbox;

use crate::constants::geo::FALLBACK_ADDRESS_PRECISION;
use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Structured address for a coordinate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    /// Full display address
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl AddressInfo {
    /// Degraded address used when the geocoding service is unavailable
    pub fn fallback(lat: f64, lng: f64) -> Self {
        Self {
            address: format!(
                "Location at {:.prec$}, {:.prec$}",
                lat,
                lng,
                prec = FALLBACK_ADDRESS_PRECISION
            ),
            ..Self::default()
        }
    }
}

/// A forward search candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    /// Short name (e.g. "Galle Fort")
    pub label: String,
    /// Fully qualified name
    pub full_label: String,
    pub center_coordinate: Coordinates,
}

/// Trait for geocoding backends
pub trait GeocodeBackend: Send + Sync {
    /// Reverse geocode coordinates to an address
    ///
    /// Returns None when the service has no feature for the location
    fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> impl Future<Output = Result<Option<AddressInfo>>> + Send;

    /// Search places matching free text, best match first
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SearchResult>>> + Send;
}

impl<T: GeocodeBackend> GeocodeBackend for Arc<T> {
    fn reverse_geocode(
        &self,
        lat: f64,
        lng: f64,
    ) -> impl Future<Output = Result<Option<AddressInfo>>> + Send {
        (**self).reverse_geocode(lat, lng)
    }

    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SearchResult>>> + Send {
        (**self).search(query, limit)
    }
}

/// Reverse geocoder with a fallback-never-fails contract
#[derive(Debug, Clone)]
pub struct GeocodeClient<G> {
    backend: G,
}

impl<G: GeocodeBackend> GeocodeClient<G> {
    pub fn new(backend: G) -> Self {
        Self { backend }
    }

    /// Resolve an address for the coordinate, synthesizing one on failure
    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> AddressInfo {
        match self.backend.reverse_geocode(lat, lng).await {
            Ok(Some(info)) => info,
            Ok(None) => {
                debug!("No geocoding result for {}, {}", lat, lng);
                AddressInfo::fallback(lat, lng)
            }
            Err(e) => {
                warn!("Reverse geocoding failed for {}, {}: {}", lat, lng, e);
                AddressInfo::fallback(lat, lng)
            }
        }
    }

    /// Convenience wrapper over [`Self::reverse_geocode`]
    pub async fn address_for(&self, coords: Coordinates) -> AddressInfo {
        self.reverse_geocode(coords.lat, coords.lng).await
    }

    pub fn backend(&self) -> &G {
        &self.backend
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::Error;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scripted geocoder recording every call
    #[derive(Debug, Default)]
    pub struct StubGeocoder {
        pub address: Option<AddressInfo>,
        pub fail: bool,
        pub results: Vec<SearchResult>,
        pub reverse_calls: Mutex<Vec<(f64, f64)>>,
        pub queries: Mutex<Vec<(String, tokio::time::Instant)>>,
        /// Reverse lookups answer only after this long
        pub delay: Option<Duration>,
    }

    impl StubGeocoder {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn with_address(address: &str) -> Self {
            Self {
                address: Some(AddressInfo {
                    address: address.to_string(),
                    city: Some("Galle".to_string()),
                    ..AddressInfo::default()
                }),
                ..Self::default()
            }
        }

        pub fn with_results(labels: &[&str]) -> Self {
            let results = labels
                .iter()
                .enumerate()
                .map(|(i, label)| result(label, 6.0 + i as f64, 80.0))
                .collect();
            Self {
                results,
                ..Self::default()
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn query_log(&self) -> Vec<(String, tokio::time::Instant)> {
            self.queries.lock().unwrap().clone()
        }
    }

    pub fn result(label: &str, lat: f64, lng: f64) -> SearchResult {
        SearchResult {
            id: format!("place.{}", label.to_lowercase()),
            label: label.to_string(),
            full_label: format!("{}, Sri Lanka", label),
            center_coordinate: Coordinates::new(lat, lng),
        }
    }

    impl GeocodeBackend for StubGeocoder {
        async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Option<AddressInfo>> {
            self.reverse_calls.lock().unwrap().push((lat, lng));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(Error::Geocoding("service unreachable".to_string()));
            }
            Ok(self.address.clone())
        }

        async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
            self.queries
                .lock()
                .unwrap()
                .push((query.to_string(), tokio::time::Instant::now()));
            if self.fail {
                return Err(Error::Geocoding("service unreachable".to_string()));
            }
            Ok(self.results.iter().take(limit).cloned().collect())
        }
    }
}
