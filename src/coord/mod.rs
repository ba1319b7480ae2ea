//! Coordinates and bounding boxes
//!
//! Everything on the map is addressed by plain latitude/longitude pairs.
//! External map SDKs and GeoJSON use `[lng, lat]` ordering; conversions
//! live here so the rest of the crate never has to think about it.

pub mod distance;

use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Build from GeoJSON `[lng, lat]` ordering
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lng: pair[0],
        }
    }

    /// GeoJSON `[lng, lat]` ordering
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

impl Bounds {
    /// Smallest box containing every coordinate, or None when empty
    pub fn from_coordinates(coords: &[Coordinates]) -> Option<Self> {
        let first = coords.first()?;
        let mut bounds = Bounds {
            south_west: *first,
            north_east: *first,
        };
        for c in &coords[1..] {
            bounds.south_west.lat = bounds.south_west.lat.min(c.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(c.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(c.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(c.lng);
        }
        Some(bounds)
    }

    /// Center of the box
    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// True when the box has no extent (a single point)
    pub fn is_point(&self) -> bool {
        self.south_west == self.north_east
    }
}
