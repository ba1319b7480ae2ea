//! Great-circle distances
//!
//! Approximate (spherical earth). Good enough for leg lengths on an
//! itinerary, not for navigation.

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::coord::Coordinates;

/// Calculate the distance between two points in meters (Haversine formula)
pub fn haversine_distance(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();
    let delta_lat = (p2.lat - p1.lat).to_radians();
    let delta_lng = (p2.lng - p1.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Total length of a polyline in meters
pub fn path_length(path: &[Coordinates]) -> f64 {
    path.windows(2)
        .map(|w| haversine_distance(w[0], w[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // One degree of latitude is roughly 111 km
        let a = Coordinates::new(6.0, 80.0);
        let b = Coordinates::new(7.0, 80.0);

        let distance = haversine_distance(a, b);
        assert!(
            (distance - 111_000.0).abs() < 1000.0,
            "Distance {} should be approximately 111000",
            distance
        );
    }

    #[test]
    fn test_zero_distance() {
        let a = Coordinates::new(6.0535, 80.2210);
        assert_eq!(haversine_distance(a, a), 0.0);
    }

    #[test]
    fn test_path_length_sums_legs() {
        let a = Coordinates::new(6.0, 80.0);
        let b = Coordinates::new(6.5, 80.0);
        let c = Coordinates::new(7.0, 80.0);

        let total = path_length(&[a, b, c]);
        approx::assert_relative_eq!(total, haversine_distance(a, c), max_relative = 1e-9);
        assert_eq!(path_length(&[a]), 0.0);
        assert_eq!(path_length(&[]), 0.0);
    }
}
