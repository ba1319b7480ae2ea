//! Map surface
//!
//! [`MapSurface`] owns one viewport of a mapping SDK for the lifetime of a
//! mount. It knows coordinates and opaque marker ids, nothing about tours.
//! Every camera, marker, and layer change goes through it; on teardown (or
//! drop) it releases markers, layers, listeners, and the viewport.
//!
//! The SDK itself sits behind [`MapSdk`], a narrow imperative interface.
//! [`headless::HeadlessMap`] implements it in memory for tests and for the
//! HTTP API, where a web client renders the recorded state.

pub mod headless;
pub mod marker;

pub use headless::HeadlessMap;
pub use marker::{MarkerSpec, MarkerStyle};

use crate::coord::{Bounds, Coordinates};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::debug;

/// SDK-assigned marker handle
pub type MarkerHandle = u64;

/// Paint properties of a line layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    pub dashed: bool,
}

/// Raw input delivered by the SDK
#[derive(Debug, Clone, PartialEq)]
pub enum SdkEvent {
    Click(Coordinates),
    MarkerClick(MarkerHandle),
}

/// Events the surface emits to its listeners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEvent {
    SurfaceClick { coordinate: Coordinates },
    MarkerClick { marker_id: String },
}

/// The slice of a mapping SDK the surface consumes
pub trait MapSdk {
    fn create_viewport(&mut self, container: &str, center: Coordinates, zoom: f64) -> Result<()>;

    fn destroy_viewport(&mut self);

    fn add_marker(&mut self, coordinate: Coordinates, style: &MarkerStyle) -> Result<MarkerHandle>;

    fn remove_marker(&mut self, handle: MarkerHandle);

    fn attach_popup(&mut self, handle: MarkerHandle, text: &str);

    fn fly_to(&mut self, center: Coordinates, zoom: f64);

    fn fit_bounds(&mut self, bounds: Bounds, padding: f64);

    /// Add a GeoJSON source plus line layer under `layer_id`
    fn add_line_layer(
        &mut self,
        layer_id: &str,
        geometry: serde_json::Value,
        style: &LineStyle,
    ) -> Result<()>;

    /// Remove the layer and its source
    fn remove_line_layer(&mut self, layer_id: &str);
}

/// Caller-owned map viewport with marker and layer lifecycle
#[derive(Debug)]
pub struct MapSurface<S: MapSdk> {
    sdk: S,
    initialized: bool,
    torn_down: bool,
    markers: HashMap<MarkerHandle, String>,
    route_layer: Option<String>,
    listeners: Vec<mpsc::UnboundedSender<MapEvent>>,
}

impl<S: MapSdk> MapSurface<S> {
    pub fn new(sdk: S) -> Self {
        Self {
            sdk,
            initialized: false,
            torn_down: false,
            markers: HashMap::new(),
            route_layer: None,
            listeners: Vec::new(),
        }
    }

    /// Create the viewport; a second call while initialized does nothing
    pub fn initialize(&mut self, container: &str, center: Coordinates, zoom: f64) -> Result<()> {
        if self.torn_down {
            return Err(Error::TornDown);
        }
        if self.initialized {
            debug!("Map already initialized; ignoring re-initialization");
            return Ok(());
        }
        center.validate()?;
        self.sdk.create_viewport(container, center, zoom)?;
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.torn_down {
            return Err(Error::TornDown);
        }
        if !self.initialized {
            return Err(Error::Map("map surface is not initialized".to_string()));
        }
        Ok(())
    }

    /// Replace the whole marker set
    pub fn set_markers(&mut self, markers: &[MarkerSpec]) -> Result<()> {
        self.ensure_ready()?;
        self.clear_markers();

        for spec in markers {
            let handle = self.sdk.add_marker(spec.coordinate, &spec.style())?;
            self.sdk.attach_popup(handle, &spec.label);
            self.markers.insert(handle, spec.id.clone());
        }
        Ok(())
    }

    fn clear_markers(&mut self) {
        for (handle, _) in self.markers.drain() {
            self.sdk.remove_marker(handle);
        }
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Fly the camera to a single coordinate
    pub fn focus_on(&mut self, coordinate: Coordinates, zoom: f64) -> Result<()> {
        self.ensure_ready()?;
        self.sdk.fly_to(coordinate, zoom);
        Ok(())
    }

    /// Fit the camera around every coordinate; empty input does nothing
    pub fn fit_bounds(&mut self, coordinates: &[Coordinates], padding: f64) -> Result<()> {
        self.ensure_ready()?;
        if let Some(bounds) = Bounds::from_coordinates(coordinates) {
            self.sdk.fit_bounds(bounds, padding);
        }
        Ok(())
    }

    /// Paint a line layer, replacing whatever route layer was there
    pub fn paint_route(
        &mut self,
        layer_id: &str,
        geometry: serde_json::Value,
        style: &LineStyle,
    ) -> Result<()> {
        self.ensure_ready()?;
        self.clear_route();
        self.sdk.add_line_layer(layer_id, geometry, style)?;
        self.route_layer = Some(layer_id.to_string());
        Ok(())
    }

    /// Remove the route layer if one is painted
    pub fn clear_route(&mut self) {
        if let Some(layer_id) = self.route_layer.take() {
            self.sdk.remove_line_layer(&layer_id);
        }
    }

    pub fn has_route(&self) -> bool {
        self.route_layer.is_some()
    }

    /// Register a listener for surface and marker clicks
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<MapEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(tx);
        rx
    }

    /// Translate raw SDK input into a [`MapEvent`] and notify listeners
    ///
    /// Returns the event so a synchronous owner can act on it directly.
    /// Input arriving before initialization or after teardown is dropped.
    pub fn handle_sdk_event(&mut self, event: SdkEvent) -> Option<MapEvent> {
        if !self.initialized || self.torn_down {
            return None;
        }

        let event = match event {
            SdkEvent::Click(coordinate) => MapEvent::SurfaceClick { coordinate },
            SdkEvent::MarkerClick(handle) => {
                let marker_id = self.markers.get(&handle)?.clone();
                MapEvent::MarkerClick { marker_id }
            }
        };

        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
        Some(event)
    }

    /// SDK handle of the marker showing `id`
    pub fn marker_handle(&self, id: &str) -> Option<MarkerHandle> {
        self.markers
            .iter()
            .find(|(_, marker_id)| marker_id.as_str() == id)
            .map(|(handle, _)| *handle)
    }

    /// Release every SDK resource; safe to call more than once
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.listeners.clear();

        if self.initialized {
            self.clear_markers();
            self.clear_route();
            self.sdk.destroy_viewport();
            self.initialized = false;
        }
        debug!("Map surface torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }
}

impl<S: MapSdk> Drop for MapSurface<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
