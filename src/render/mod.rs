//! Route derivation and painting
//!
//! State machine:
//!
//! ```text
//!   Empty ──(>=2 stops, route found)──▶ Routed
//!     ▲  ╲                               │
//!     │   ╲(>=2 stops, call failed)      │ (next change)
//!     │    ▼                             ▼
//!     └─(<2 stops)── Approximated ◀── recompute
//! ```
//!
//! Every change to the stops regenerates the geometry from scratch. A failed
//! directions call degrades immediately to straight segments; there is no
//! retry.

use crate::constants::map::{
    APPROXIMATED_LINE_COLOR, ROUTED_LINE_COLOR, ROUTE_LAYER_ID, ROUTE_LINE_WIDTH,
};
use crate::coord::Coordinates;
use crate::directions::{DirectionsBackend, Provenance, RouteGeometry};
use crate::error::Result;
use crate::map::{LineStyle, MapSdk, MapSurface};
use crate::stop::Stop;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What the renderer currently shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RouteState {
    /// Fewer than two stops
    Empty,
    Routed { geometry: RouteGeometry },
    Approximated { geometry: RouteGeometry },
}

impl RouteState {
    pub fn geometry(&self) -> Option<&RouteGeometry> {
        match self {
            Self::Empty => None,
            Self::Routed { geometry } | Self::Approximated { geometry } => Some(geometry),
        }
    }

    fn from_geometry(geometry: RouteGeometry) -> Self {
        match geometry.provenance {
            Provenance::Routed => Self::Routed { geometry },
            Provenance::Approximated => Self::Approximated { geometry },
        }
    }
}

/// Stop coordinates in `sequence_no` order
pub fn waypoints(stops: &[Stop]) -> Vec<Coordinates> {
    let mut ordered: Vec<&Stop> = stops.iter().collect();
    ordered.sort_by_key(|s| s.sequence_no);
    ordered.iter().map(|s| s.coordinates()).collect()
}

/// Derive the route for a stop list without touching any map
pub async fn derive_route<D: DirectionsBackend>(directions: &D, stops: &[Stop]) -> RouteState {
    let points = waypoints(stops);
    if points.len() < 2 {
        return RouteState::Empty;
    }

    let geometry = match directions.route(&points).await {
        Ok(Some(path)) if path.len() >= 2 => RouteGeometry::routed(path),
        Ok(_) => {
            debug!("Directions returned no route; using straight segments");
            RouteGeometry::straight(&points)
        }
        Err(e) => {
            warn!("Directions unavailable, approximating route: {}", e);
            RouteGeometry::straight(&points)
        }
    };

    RouteState::from_geometry(geometry)
}

/// Line style distinguishing routed from approximated geometry
pub fn line_style(provenance: Provenance) -> LineStyle {
    match provenance {
        Provenance::Routed => LineStyle {
            color: ROUTED_LINE_COLOR.to_string(),
            width: ROUTE_LINE_WIDTH,
            dashed: false,
        },
        Provenance::Approximated => LineStyle {
            color: APPROXIMATED_LINE_COLOR.to_string(),
            width: ROUTE_LINE_WIDTH,
            dashed: true,
        },
    }
}

/// Keeps the route layer in step with the stops
#[derive(Debug)]
pub struct RouteRenderer<D> {
    directions: D,
    state: RouteState,
    generation: u64,
    /// Waypoints of the most recent recompute
    waypoints: Option<Vec<Coordinates>>,
}

impl<D: DirectionsBackend> RouteRenderer<D> {
    pub fn new(directions: D) -> Self {
        Self {
            directions,
            state: RouteState::Empty,
            generation: 0,
            waypoints: None,
        }
    }

    /// True when the last recompute already covered these stops' positions
    /// and the directions service answered it; approximations never count
    pub fn is_current(&self, stops: &[Stop]) -> bool {
        !matches!(self.state, RouteState::Approximated { .. })
            && self.waypoints.as_deref() == Some(waypoints(stops).as_slice())
    }

    pub fn state(&self) -> &RouteState {
        &self.state
    }

    /// Start a recompute for `stops`; earlier generations will be ignored
    pub fn begin(&mut self, stops: &[Stop]) -> u64 {
        self.waypoints = Some(waypoints(stops));
        self.generation += 1;
        self.generation
    }

    /// Derive the route for `stops` (the network half of a recompute)
    pub async fn derive(&self, stops: &[Stop]) -> RouteState {
        derive_route(&self.directions, stops).await
    }

    /// Adopt and paint a derived state if it is still current
    pub fn apply<S: MapSdk>(
        &mut self,
        generation: u64,
        state: RouteState,
        surface: &mut MapSurface<S>,
    ) -> Result<bool> {
        if generation != self.generation {
            debug!(
                "Discarding stale route (generation {} < {})",
                generation, self.generation
            );
            return Ok(false);
        }
        self.state = state;
        self.paint(surface)?;
        Ok(true)
    }

    /// Derive and paint in one step
    pub async fn recompute<S: MapSdk>(
        &mut self,
        stops: &[Stop],
        surface: &mut MapSurface<S>,
    ) -> Result<&RouteState> {
        let generation = self.begin(stops);
        let state = self.derive(stops).await;
        self.apply(generation, state, surface)?;
        Ok(&self.state)
    }

    /// Put the current state on the map, replacing any previous route layer
    pub fn paint<S: MapSdk>(&self, surface: &mut MapSurface<S>) -> Result<()> {
        match self.state.geometry() {
            None => {
                surface.clear_route();
                Ok(())
            }
            Some(geometry) => surface.paint_route(
                ROUTE_LAYER_ID,
                geometry.to_geojson(),
                &line_style(geometry.provenance),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::test_support::{detour, Answer, StubDirections};
    use crate::map::HeadlessMap;
    use crate::stop::test_support::stop;

    fn surface() -> MapSurface<HeadlessMap> {
        let mut surface = MapSurface::new(HeadlessMap::new());
        surface
            .initialize("map", Coordinates::new(6.0, 80.0), 12.0)
            .unwrap();
        surface
    }

    fn three_stops_shuffled() -> Vec<Stop> {
        vec![
            stop("C", 3, 6.2, 80.2),
            stop("A", 1, 6.0, 80.0),
            stop("B", 2, 6.1, 80.3),
        ]
    }

    #[tokio::test]
    async fn test_rejecting_directions_yields_straight_segments() {
        let directions = StubDirections::new(Answer::Reject);
        let state = derive_route(&directions, &three_stops_shuffled()).await;

        let a = Coordinates::new(6.0, 80.0);
        let b = Coordinates::new(6.1, 80.3);
        let c = Coordinates::new(6.2, 80.2);
        match &state {
            RouteState::Approximated { geometry } => {
                assert_eq!(geometry.coordinates, vec![a, b, c]);
                let segments: Vec<_> = geometry.segments().collect();
                assert_eq!(segments, vec![(a, b), (b, c)]);
            }
            other => panic!("expected approximated route, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_route_yields_straight_segments() {
        let directions = StubDirections::new(Answer::NoRoute);
        let state = derive_route(&directions, &three_stops_shuffled()).await;
        assert!(matches!(state, RouteState::Approximated { .. }));
    }

    #[tokio::test]
    async fn test_successful_directions_are_routed_in_sequence_order() {
        let directions = StubDirections::new(Answer::Detour);
        let state = derive_route(&directions, &three_stops_shuffled()).await;

        let sent = directions.calls.lock().unwrap()[0].clone();
        assert_eq!(sent[0], Coordinates::new(6.0, 80.0));
        assert_eq!(sent[2], Coordinates::new(6.2, 80.2));

        match state {
            RouteState::Routed { geometry } => assert_eq!(geometry.coordinates, detour(&sent)),
            other => panic!("expected routed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fewer_than_two_stops_is_empty_without_calling() {
        let directions = StubDirections::new(Answer::Detour);
        assert_eq!(derive_route(&directions, &[]).await, RouteState::Empty);
        assert_eq!(
            derive_route(&directions, &[stop("A", 1, 6.0, 80.0)]).await,
            RouteState::Empty
        );
        assert_eq!(directions.call_count(), 0);
    }

    #[tokio::test]
    async fn test_recompute_paints_and_clears_single_layer() {
        let mut renderer = RouteRenderer::new(StubDirections::new(Answer::Reject));
        let mut surface = surface();

        renderer
            .recompute(&three_stops_shuffled(), &mut surface)
            .await
            .unwrap();
        let layers = surface.sdk().layers();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].id, ROUTE_LAYER_ID);
        assert!(layers[0].style.dashed);

        renderer
            .recompute(&three_stops_shuffled()[..2], &mut surface)
            .await
            .unwrap();
        assert_eq!(surface.sdk().layers().len(), 1);

        renderer
            .recompute(&three_stops_shuffled()[..1], &mut surface)
            .await
            .unwrap();
        assert_eq!(renderer.state(), &RouteState::Empty);
        assert!(surface.sdk().layers().is_empty());
    }

    #[tokio::test]
    async fn test_stale_generation_is_discarded() {
        let mut renderer = RouteRenderer::new(StubDirections::new(Answer::Detour));
        let mut surface = surface();

        let stops = three_stops_shuffled();
        let old = renderer.begin(&stops);
        let old_state = renderer.derive(&stops).await;
        let _current = renderer.begin(&stops[..2]);

        assert!(!renderer.apply(old, old_state, &mut surface).unwrap());
        assert_eq!(renderer.state(), &RouteState::Empty);
        assert!(surface.sdk().layers().is_empty());
    }

    #[tokio::test]
    async fn test_is_current_tracks_positions_not_names() {
        let mut renderer = RouteRenderer::new(StubDirections::new(Answer::Detour));
        let mut surface = surface();
        let mut stops = three_stops_shuffled();
        assert!(!renderer.is_current(&stops));

        renderer.recompute(&stops, &mut surface).await.unwrap();
        assert!(renderer.is_current(&stops));

        stops[0].name = "Renamed".to_string();
        assert!(renderer.is_current(&stops));

        stops[0].sequence_no = 0;
        assert!(!renderer.is_current(&stops));
    }

    #[tokio::test]
    async fn test_approximated_route_is_never_current() {
        let mut renderer = RouteRenderer::new(StubDirections::new(Answer::Reject));
        let mut surface = surface();
        let stops = three_stops_shuffled();

        renderer.recompute(&stops, &mut surface).await.unwrap();
        assert!(matches!(renderer.state(), RouteState::Approximated { .. }));
        assert!(!renderer.is_current(&stops));
    }

    #[test]
    fn test_route_state_serialization() {
        let json = serde_json::to_value(RouteState::Empty).unwrap();
        assert_eq!(json["state"], "empty");
    }
}
