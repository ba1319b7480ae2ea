//! Server shared state
//!
//! Holds configuration, the shared geocoding and directions backends, and one
//! builder session per tour.

use crate::builder::{RouteBuilder, TourForm};
use crate::config::Config;
use crate::directions::DirectionsBackend;
use crate::geo::GeocodeBackend;
use crate::lifecycle::Lifecycle;
use crate::map::HeadlessMap;
use crate::stop::Stop;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Server-side stand-in for the tour form: keeps the last published list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishedStops {
    /// Bumped on every publish
    pub revision: u64,
    pub stops: Vec<Stop>,
}

impl TourForm for PublishedStops {
    fn stops_changed(&mut self, tour_id: &str, stops: &[Stop]) {
        self.revision += 1;
        self.stops = stops.to_vec();
        debug!(
            "Tour {} form updated (revision {}, {} stops)",
            tour_id,
            self.revision,
            stops.len()
        );
    }
}

pub type SessionBuilder<G, D> = RouteBuilder<HeadlessMap, G, Arc<D>, PublishedStops>;

/// One mounted builder
pub struct Session<G, D>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend,
{
    /// Cloned out of the builder so teardown does not wait on its lock
    pub lifecycle: Lifecycle,
    pub builder: Mutex<SessionBuilder<G, D>>,
}

impl<G, D> Session<G, D>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend,
{
    pub fn new(builder: SessionBuilder<G, D>) -> Self {
        Self {
            lifecycle: builder.lifecycle(),
            builder: Mutex::new(builder),
        }
    }

    /// Abandon whatever the builder is awaiting, then release its map
    pub async fn teardown(&self) {
        self.lifecycle.teardown();
        self.builder.lock().await.teardown();
    }
}

/// Shared state for the HTTP server
pub struct AppState<G, D>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend,
{
    pub config: Arc<RwLock<Config>>,
    pub geocoder: Arc<G>,
    pub directions: Arc<D>,
    sessions: RwLock<HashMap<String, Arc<Session<G, D>>>>,
    started_at: Instant,
}

impl<G, D> AppState<G, D>
where
    G: GeocodeBackend + 'static,
    D: DirectionsBackend,
{
    pub fn new(config: Config, geocoder: G, directions: D) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            geocoder: Arc::new(geocoder),
            directions: Arc::new(directions),
            sessions: RwLock::new(HashMap::new()),
            started_at: Instant::now(),
        }
    }

    pub async fn session(&self, tour_id: &str) -> Option<Arc<Session<G, D>>> {
        self.sessions.read().await.get(tour_id).cloned()
    }

    /// Store a session, tearing down any previous one for the same tour
    pub async fn insert_session(&self, tour_id: &str, session: Session<G, D>) -> Arc<Session<G, D>> {
        let session = Arc::new(session);
        let previous = self
            .sessions
            .write()
            .await
            .insert(tour_id.to_string(), Arc::clone(&session));
        if let Some(previous) = previous {
            debug!("Replacing builder session for tour {}", tour_id);
            previous.teardown().await;
        }
        session
    }

    /// Remove and tear down a session; false if there was none
    pub async fn remove_session(&self, tour_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(tour_id);
        match removed {
            Some(session) => {
                session.teardown().await;
                true
            }
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
