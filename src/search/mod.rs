//! Debounced place search layered on the map
//!
//! Each keystroke restarts a timer; the query goes out once typing pauses
//! for the debounce interval. Every issued query carries a monotonically
//! increasing token and a response is applied only while its token is still
//! the latest, so a slow answer to an old query can never overwrite a newer
//! one.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::geo::{GeocodeBackend, SearchResult};
use crate::lifecycle::Lifecycle;
use crate::map::{MapSdk, MapSurface};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Tunables for the overlay
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub limit: usize,
    /// Where an empty submit recenters the map
    pub default_center: Coordinates,
    pub default_zoom: f64,
    /// Zoom used when a result is selected
    pub selected_zoom: f64,
}

impl SearchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.debounce(),
            limit: config.search.limit,
            default_center: config.default_center(),
            default_zoom: config.map.initial_zoom,
            selected_zoom: config.map.selected_zoom,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Results of one issued query
#[derive(Debug, Clone)]
pub struct SearchResponse {
    pub token: u64,
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// Search box state plus its in-flight work
#[derive(Debug)]
pub struct SearchOverlay<G> {
    backend: Arc<G>,
    settings: SearchSettings,
    query: String,
    results: Vec<SearchResult>,
    open: bool,
    latest_token: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SearchResponse>,
    rx: mpsc::UnboundedReceiver<SearchResponse>,
    lifecycle: Lifecycle,
}

impl<G: GeocodeBackend + 'static> SearchOverlay<G> {
    pub fn new(backend: Arc<G>, settings: SearchSettings, lifecycle: Lifecycle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            settings,
            query: String::new(),
            results: Vec::new(),
            open: false,
            latest_token: 0,
            pending: None,
            tx,
            rx,
            lifecycle,
        }
    }

    /// A keystroke: update the field and (re)start the debounce timer
    ///
    /// Clearing the field clears the results at once, without waiting.
    pub fn input(&mut self, text: impl Into<String>) {
        if self.lifecycle.is_torn_down() {
            return;
        }
        self.query = text.into();
        self.cancel_pending();

        if self.query.trim().is_empty() {
            // Invalidate anything still in flight
            self.issue_token();
            self.results.clear();
            self.open = false;
            return;
        }

        let token = self.issue_token();
        self.spawn_query(token, Some(self.settings.debounce));
    }

    /// Clear the field
    pub fn clear(&mut self) {
        self.input(String::new());
    }

    fn issue_token(&mut self) -> u64 {
        self.latest_token += 1;
        self.latest_token
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn spawn_query(&mut self, token: u64, delay: Option<Duration>) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let lifecycle = self.lifecycle.clone();
        let query = self.query.trim().to_string();
        let limit = self.settings.limit;

        self.pending = Some(tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            debug!("Issuing search #{} for {:?}", token, query);
            let results = match lifecycle.guard(backend.search(&query, limit)).await {
                None => return,
                Some(Ok(results)) => results,
                Some(Err(e)) => {
                    warn!("Place search failed for {:?}: {}", query, e);
                    Vec::new()
                }
            };
            let _ = tx.send(SearchResponse {
                token,
                query,
                results,
            });
        }));
    }

    /// Apply a response if it answers the latest query
    pub fn apply(&mut self, response: SearchResponse) -> bool {
        if self.lifecycle.is_torn_down() {
            return false;
        }
        if response.token != self.latest_token {
            debug!(
                "Discarding stale search #{} (latest is #{})",
                response.token, self.latest_token
            );
            return false;
        }
        self.open = !response.results.is_empty();
        self.results = response.results;
        true
    }

    /// Apply every response that has already arrived; returns how many stuck
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(response) = self.rx.try_recv() {
            if self.apply(response) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next response and apply it
    ///
    /// Returns None once the overlay is torn down.
    pub async fn next_response(&mut self) -> Option<bool> {
        let response = self.lifecycle.guard(self.rx.recv()).await??;
        Some(self.apply(response))
    }

    /// Pick a candidate: center the map on it and show its label
    pub fn select<S: MapSdk>(
        &mut self,
        index: usize,
        surface: &mut MapSurface<S>,
    ) -> Result<Option<SearchResult>> {
        let Some(result) = self.results.get(index).cloned() else {
            return Ok(None);
        };
        surface.focus_on(result.center_coordinate, self.settings.selected_zoom)?;
        self.cancel_pending();
        self.issue_token();
        self.query = result.label.clone();
        self.open = false;
        Ok(Some(result))
    }

    /// Enter pressed in the field
    ///
    /// Empty field: recenter on the default location. Results already
    /// listed: select the first. Otherwise query immediately.
    pub async fn submit<S: MapSdk>(
        &mut self,
        surface: &mut MapSurface<S>,
    ) -> Result<Option<SearchResult>> {
        if self.lifecycle.is_torn_down() {
            return Ok(None);
        }

        if self.query.trim().is_empty() {
            surface.focus_on(self.settings.default_center, self.settings.default_zoom)?;
            return Ok(None);
        }

        if !self.results.is_empty() {
            return self.select(0, surface);
        }

        self.cancel_pending();
        let token = self.issue_token();
        let query = self.query.trim().to_string();
        let outcome = self
            .lifecycle
            .guard(self.backend.search(&query, self.settings.limit))
            .await;

        let results = match outcome {
            None => return Ok(None),
            Some(Ok(results)) => results,
            Some(Err(e)) => {
                warn!("Place search failed for {:?}: {}", query, e);
                Vec::new()
            }
        };
        self.apply(SearchResponse {
            token,
            query,
            results,
        });
        Ok(None)
    }

    /// Click outside the search container
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    /// Stop timers and in-flight queries
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.issue_token();
        self.results.clear();
        self.open = false;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }
}

impl<G> Drop for SearchOverlay<G> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
