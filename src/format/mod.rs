//! Output formatters
//!
//! Render a derived [`RoutePlan`] for export.

pub mod geojson;
pub mod gpx;
pub mod json;
pub mod text;

use crate::coord::distance::haversine_distance;
use crate::directions::DirectionsBackend;
use crate::error::Result;
use crate::render::{derive_route, RouteState};
use crate::stop::{Stop, StopSequence};
use serde::{Deserialize, Serialize};

/// A tour's stops together with the route through them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub tour_id: String,
    pub stops: Vec<Stop>,
    pub route: RouteState,
}

impl RoutePlan {
    /// Normalize `stops` and derive their route
    pub async fn derive<D: DirectionsBackend>(
        tour_id: impl Into<String>,
        stops: Vec<Stop>,
        directions: &D,
    ) -> Self {
        let stops = StopSequence::from_stops(stops).into_stops();
        let route = derive_route(directions, &stops).await;
        Self {
            tour_id: tour_id.into(),
            stops,
            route,
        }
    }

    /// Straight-line distance of each leg, in meters
    pub fn leg_distances(&self) -> Vec<f64> {
        self.stops
            .windows(2)
            .map(|w| haversine_distance(w[0].coordinates(), w[1].coordinates()))
            .collect()
    }

    /// Length of the painted route, or zero without one
    pub fn route_length_meters(&self) -> f64 {
        self.route.geometry().map_or(0.0, |g| g.length_meters())
    }
}

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    pub name: String,
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn format(&self, plan: &RoutePlan) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "geojson" => Some(Box::new(geojson::GeoJsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    ["json", "geojson", "text", "gpx"]
        .iter()
        .filter_map(|name| get_formatter(name))
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}
