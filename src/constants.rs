//! Centralized constants for the tour-route crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters (WGS84 approximation)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

    /// Decimal places used when synthesizing a fallback address
    pub const FALLBACK_ADDRESS_PRECISION: usize = 6;
}

/// External API endpoints
pub mod api {
    /// Mapbox geocoding API (reverse + forward)
    pub const MAPBOX_GEOCODING_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

    /// Mapbox directions API
    pub const MAPBOX_DIRECTIONS_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";

    /// Environment variable consulted when no access token is configured
    pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

    /// User agent sent with every outbound request
    pub const USER_AGENT: &str = concat!("tour-route/", env!("CARGO_PKG_VERSION"));
}

/// Map rendering constants
pub mod map {
    /// Id of the single route layer painted on the map
    pub const ROUTE_LAYER_ID: &str = "tour-route";

    /// Route line color when the path came from the directions service
    pub const ROUTED_LINE_COLOR: &str = "#3b82f6";

    /// Route line color for straight-line fallback segments
    pub const APPROXIMATED_LINE_COLOR: &str = "#9ca3af";

    /// Route line width in pixels
    pub const ROUTE_LINE_WIDTH: f64 = 4.0;

    /// Marker color for unselected stops
    pub const MARKER_COLOR: &str = "#2563eb";

    /// Marker color for the selected stop
    pub const SELECTED_MARKER_COLOR: &str = "#f97316";

    /// Marker scale for unselected stops
    pub const MARKER_SCALE: f64 = 1.0;

    /// Marker scale for the selected stop
    pub const SELECTED_MARKER_SCALE: f64 = 1.4;
}
