//! Directions module
//!
//! Turns an ordered waypoint list into a path geometry. A backend reports
//! failure through `Err` or `Ok(None)`; deciding what to draw instead is
//! the route renderer's job.

pub mod mapbox;

use crate::coord::distance::path_length;
use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

/// Where a route geometry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Returned by the directions service
    Routed,
    /// Straight segments between consecutive stops
    Approximated,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Routed => write!(f, "routed"),
            Self::Approximated => write!(f, "approximated"),
        }
    }
}

/// Ordered path to draw between stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub coordinates: Vec<Coordinates>,
    pub provenance: Provenance,
}

impl RouteGeometry {
    pub fn routed(coordinates: Vec<Coordinates>) -> Self {
        Self {
            coordinates,
            provenance: Provenance::Routed,
        }
    }

    /// Straight segments connecting consecutive waypoints
    pub fn straight(waypoints: &[Coordinates]) -> Self {
        Self {
            coordinates: waypoints.to_vec(),
            provenance: Provenance::Approximated,
        }
    }

    /// Consecutive point pairs making up the line
    pub fn segments(&self) -> impl Iterator<Item = (Coordinates, Coordinates)> + '_ {
        self.coordinates.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn length_meters(&self) -> f64 {
        path_length(&self.coordinates)
    }

    /// GeoJSON LineString geometry
    pub fn to_geojson(&self) -> serde_json::Value {
        let coordinates: Vec<[f64; 2]> = self.coordinates.iter().map(|c| c.to_lng_lat()).collect();
        serde_json::json!({
            "type": "LineString",
            "coordinates": coordinates,
        })
    }
}

/// Trait for routing backends
pub trait DirectionsBackend: Send + Sync {
    /// Path through the waypoints in order, or None when no route exists
    fn route(
        &self,
        waypoints: &[Coordinates],
    ) -> impl Future<Output = Result<Option<Vec<Coordinates>>>> + Send;
}

impl<T: DirectionsBackend> DirectionsBackend for Arc<T> {
    fn route(
        &self,
        waypoints: &[Coordinates],
    ) -> impl Future<Output = Result<Option<Vec<Coordinates>>>> + Send {
        (**self).route(waypoints)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::Error;
    use std::sync::Mutex;
    use std::time::Duration;

    /// What the stub directions service answers
    #[derive(Debug, Clone)]
    pub enum Answer {
        Reject,
        NoRoute,
        /// Insert a midpoint between every pair of waypoints
        Detour,
    }

    #[derive(Debug)]
    pub struct StubDirections {
        pub answer: Answer,
        pub calls: Mutex<Vec<Vec<Coordinates>>>,
        pub delay: Option<Duration>,
    }

    impl StubDirections {
        pub fn new(answer: Answer) -> Self {
            Self {
                answer,
                calls: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    pub fn detour(waypoints: &[Coordinates]) -> Vec<Coordinates> {
        let mut path = Vec::new();
        for pair in waypoints.windows(2) {
            path.push(pair[0]);
            path.push(Coordinates::new(
                (pair[0].lat + pair[1].lat) / 2.0 + 0.001,
                (pair[0].lng + pair[1].lng) / 2.0,
            ));
        }
        if let Some(last) = waypoints.last() {
            path.push(*last);
        }
        path
    }

    impl DirectionsBackend for StubDirections {
        async fn route(&self, waypoints: &[Coordinates]) -> Result<Option<Vec<Coordinates>>> {
            self.calls.lock().unwrap().push(waypoints.to_vec());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.answer {
                Answer::Reject => Err(Error::Directions("service unreachable".to_string())),
                Answer::NoRoute => Ok(None),
                Answer::Detour => Ok(Some(detour(waypoints))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_geometry_segments() {
        let a = Coordinates::new(6.0, 80.0);
        let b = Coordinates::new(6.1, 80.1);
        let c = Coordinates::new(6.2, 80.0);
        let geometry = RouteGeometry::straight(&[a, b, c]);

        assert_eq!(geometry.provenance, Provenance::Approximated);
        let segments: Vec<_> = geometry.segments().collect();
        assert_eq!(segments, vec![(a, b), (b, c)]);
    }

    #[test]
    fn test_geojson_uses_lng_lat() {
        let geometry = RouteGeometry::routed(vec![
            Coordinates::new(6.0, 80.0),
            Coordinates::new(6.5, 80.5),
        ]);
        let json = geometry.to_geojson();
        assert_eq!(json["type"], "LineString");
        assert_eq!(json["coordinates"][0][0], 80.0);
        assert_eq!(json["coordinates"][1][1], 6.5);
    }

    #[test]
    fn test_provenance_serialization() {
        assert_eq!(
            serde_json::to_string(&Provenance::Approximated).unwrap(),
            "\"approximated\""
        );
        assert_eq!(Provenance::Routed.to_string(), "routed");
    }
}
