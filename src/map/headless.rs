//! In-memory map SDK
//!
//! Records viewport, camera, markers, and line layers instead of drawing
//! them. The HTTP API serves its [`MapSnapshot`] so a browser client can
//! render the same state with a real map library.

use crate::coord::{Bounds, Coordinates};
use crate::error::{Error, Result};
use crate::map::{LineStyle, MapSdk, MarkerHandle, MarkerStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub container: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: Coordinates,
    pub zoom: f64,
    /// Set by the last fit-to-bounds, cleared by the next fly-to
    pub fitted: Option<Bounds>,
    pub padding: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlessMarker {
    pub handle: MarkerHandle,
    pub coordinate: Coordinates,
    pub style: MarkerStyle,
    pub popup: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlessLayer {
    pub id: String,
    pub geometry: serde_json::Value,
    pub style: LineStyle,
}

/// Serializable view of everything on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub viewport: Option<Viewport>,
    pub camera: Option<Camera>,
    pub markers: Vec<HeadlessMarker>,
    pub layers: Vec<HeadlessLayer>,
}

/// Observes whether a viewport is alive after the map itself has moved
#[derive(Debug, Clone)]
pub struct LivenessFlag(Arc<AtomicBool>);

impl LivenessFlag {
    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Map SDK that keeps state in memory
#[derive(Debug, Default)]
pub struct HeadlessMap {
    viewport: Option<Viewport>,
    camera: Option<Camera>,
    markers: BTreeMap<MarkerHandle, HeadlessMarker>,
    layers: BTreeMap<String, HeadlessLayer>,
    next_handle: MarkerHandle,
    viewports_created: usize,
    markers_removed: usize,
    live: Arc<AtomicBool>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn liveness(&self) -> LivenessFlag {
        LivenessFlag(Arc::clone(&self.live))
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn markers(&self) -> Vec<&HeadlessMarker> {
        self.markers.values().collect()
    }

    pub fn layers(&self) -> Vec<&HeadlessLayer> {
        self.layers.values().collect()
    }

    pub fn viewports_created(&self) -> usize {
        self.viewports_created
    }

    pub fn markers_removed(&self) -> usize {
        self.markers_removed
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            viewport: self.viewport.clone(),
            camera: self.camera.clone(),
            markers: self.markers.values().cloned().collect(),
            layers: self.layers.values().cloned().collect(),
        }
    }

    fn require_viewport(&self) -> Result<()> {
        if self.viewport.is_none() {
            return Err(Error::Map("no viewport".to_string()));
        }
        Ok(())
    }
}

impl MapSdk for HeadlessMap {
    fn create_viewport(&mut self, container: &str, center: Coordinates, zoom: f64) -> Result<()> {
        if self.viewport.is_some() {
            return Err(Error::Map("viewport already exists".to_string()));
        }
        self.viewport = Some(Viewport {
            container: container.to_string(),
        });
        self.camera = Some(Camera {
            center,
            zoom,
            fitted: None,
            padding: None,
        });
        self.viewports_created += 1;
        self.live.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn destroy_viewport(&mut self) {
        self.viewport = None;
        self.camera = None;
        self.markers.clear();
        self.layers.clear();
        self.live.store(false, Ordering::SeqCst);
    }

    fn add_marker(&mut self, coordinate: Coordinates, style: &MarkerStyle) -> Result<MarkerHandle> {
        self.require_viewport()?;
        self.next_handle += 1;
        let handle = self.next_handle;
        self.markers.insert(
            handle,
            HeadlessMarker {
                handle,
                coordinate,
                style: style.clone(),
                popup: None,
            },
        );
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        if self.markers.remove(&handle).is_some() {
            self.markers_removed += 1;
        }
    }

    fn attach_popup(&mut self, handle: MarkerHandle, text: &str) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.popup = Some(text.to_string());
        }
    }

    fn fly_to(&mut self, center: Coordinates, zoom: f64) {
        if let Some(camera) = &mut self.camera {
            camera.center = center;
            camera.zoom = zoom;
            camera.fitted = None;
            camera.padding = None;
        }
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: f64) {
        if let Some(camera) = &mut self.camera {
            camera.center = bounds.center();
            camera.fitted = Some(bounds);
            camera.padding = Some(padding);
        }
    }

    fn add_line_layer(
        &mut self,
        layer_id: &str,
        geometry: serde_json::Value,
        style: &LineStyle,
    ) -> Result<()> {
        self.require_viewport()?;
        if self.layers.contains_key(layer_id) {
            return Err(Error::Map(format!("layer {} already exists", layer_id)));
        }
        self.layers.insert(
            layer_id.to_string(),
            HeadlessLayer {
                id: layer_id.to_string(),
                geometry,
                style: style.clone(),
            },
        );
        Ok(())
    }

    fn remove_line_layer(&mut self, layer_id: &str) {
        self.layers.remove(layer_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_layer_is_rejected() {
        let mut map = HeadlessMap::new();
        map.create_viewport("m", Coordinates::new(0.0, 0.0), 1.0)
            .unwrap();
        let style = LineStyle {
            color: "#000".to_string(),
            width: 1.0,
            dashed: false,
        };
        map.add_line_layer("r", serde_json::json!({}), &style).unwrap();
        assert!(map.add_line_layer("r", serde_json::json!({}), &style).is_err());
    }

    #[test]
    fn test_markers_need_viewport() {
        let mut map = HeadlessMap::new();
        assert!(map
            .add_marker(Coordinates::new(0.0, 0.0), &MarkerStyle::for_selection(false))
            .is_err());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut map = HeadlessMap::new();
        map.create_viewport("m", Coordinates::new(6.0, 80.0), 12.0)
            .unwrap();
        let handle = map
            .add_marker(Coordinates::new(6.0, 80.0), &MarkerStyle::for_selection(true))
            .unwrap();
        map.attach_popup(handle, "Fort");

        let json = serde_json::to_value(map.snapshot()).unwrap();
        assert_eq!(json["markers"][0]["popup"], "Fort");
        assert_eq!(json["camera"]["zoom"], 12.0);
    }
}
