//! Marker descriptions and their visual weight

use crate::constants::map::{MARKER_COLOR, MARKER_SCALE, SELECTED_MARKER_COLOR, SELECTED_MARKER_SCALE};
use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};

/// One marker the surface should show
///
/// `id` is an opaque payload handed back in marker-click events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub id: String,
    pub coordinate: Coordinates,
    pub selected: bool,
    pub label: String,
}

/// How a marker is drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: String,
    pub scale: f64,
    /// Selected markers draw above the rest
    pub z_index: i32,
}

impl MarkerStyle {
    pub fn for_selection(selected: bool) -> Self {
        if selected {
            Self {
                color: SELECTED_MARKER_COLOR.to_string(),
                scale: SELECTED_MARKER_SCALE,
                z_index: 1,
            }
        } else {
            Self {
                color: MARKER_COLOR.to_string(),
                scale: MARKER_SCALE,
                z_index: 0,
            }
        }
    }
}

impl MarkerSpec {
    pub fn style(&self) -> MarkerStyle {
        MarkerStyle::for_selection(self.selected)
    }
}
