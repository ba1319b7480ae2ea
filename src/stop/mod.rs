//! Tour stops
//!
//! A [`Stop`] is one waypoint of a tour. Stops are serialized in camelCase
//! because the tour form that owns them speaks the backend's JSON dialect.

pub mod sequence;

pub use sequence::StopSequence;

use crate::coord::Coordinates;
use crate::geo::AddressInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

const TEMPORARY_PREFIX: &str = "tmp-";

/// Identifier of a stop, unique within its sequence
///
/// Stops created on the map get a temporary id until the tour form
/// persists them and hands back the backend's id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(String);

impl StopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh temporary id for a stop that has not been persisted yet
    pub fn temporary() -> Self {
        Self(format!("{}{}", TEMPORARY_PREFIX, uuid::Uuid::new_v4()))
    }

    pub fn is_temporary(&self) -> bool {
        self.0.starts_with(TEMPORARY_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StopId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Where a stop is, plus best-effort address annotations
///
/// Latitude and longitude are authoritative; the rest may be synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl StopLocation {
    /// Combine a coordinate with a (possibly degraded) geocoding result
    pub fn from_address(coords: Coordinates, info: AddressInfo) -> Self {
        Self {
            latitude: coords.lat,
            longitude: coords.lng,
            address: info.address,
            city: info.city,
            district: info.district,
            province: info.province,
            postal_code: info.postal_code,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// One waypoint on a tour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    /// Absent until the tour backend persists the stop
    #[serde(default = "StopId::temporary")]
    pub id: StopId,
    pub sequence_no: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: StopLocation,
}

impl Stop {
    /// New unpersisted stop named after its position
    pub fn new(sequence_no: u32, location: StopLocation) -> Self {
        Self {
            id: StopId::temporary(),
            sequence_no,
            name: default_name(sequence_no),
            description: None,
            location,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        self.location.coordinates()
    }
}

/// Default display name for a freshly placed stop
pub fn default_name(sequence_no: u32) -> String {
    format!("Stop {}", sequence_no)
}

/// Field replacements applied by [`StopSequence::update`]
///
/// `None` leaves a field untouched; `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub location: Option<StopLocation>,
}

impl StopPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    fn apply(&self, stop: &mut Stop) {
        if let Some(name) = &self.name {
            stop.name = name.clone();
        }
        if let Some(description) = &self.description {
            stop.description = description.clone();
        }
        if let Some(location) = &self.location {
            stop.location = location.clone();
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A persisted-looking stop at the given coordinate
    pub fn stop(id: &str, sequence_no: u32, lat: f64, lng: f64) -> Stop {
        Stop {
            id: StopId::new(id),
            sequence_no,
            name: id.to_string(),
            description: None,
            location: StopLocation {
                latitude: lat,
                longitude: lng,
                address: format!("{} street", id),
                city: None,
                district: None,
                province: None,
                postal_code: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::stop;
    use super::*;

    #[test]
    fn test_temporary_ids_are_unique() {
        let a = StopId::temporary();
        let b = StopId::temporary();
        assert!(a.is_temporary());
        assert_ne!(a, b);
        assert!(!StopId::new("42").is_temporary());
    }

    #[test]
    fn test_new_stop_default_name() {
        let location = StopLocation::from_address(
            Coordinates::new(6.0535, 80.2210),
            AddressInfo::fallback(6.0535, 80.2210),
        );
        let stop = Stop::new(3, location);
        assert_eq!(stop.name, "Stop 3");
        assert_eq!(stop.sequence_no, 3);
        assert!(stop.id.is_temporary());
    }

    #[test]
    fn test_camel_case_wire_format() {
        let mut s = stop("A", 1, 6.0, 80.0);
        s.location.postal_code = Some("80000".to_string());
        let json = serde_json::to_value(&s).unwrap();

        assert_eq!(json["sequenceNo"], 1);
        assert_eq!(json["location"]["postalCode"], "80000");
        assert!(json["location"].get("city").is_none());

        let back: Stop = serde_json::from_value(json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_unsaved_stop_without_id_gets_temporary_id() {
        let json = serde_json::json!({
            "sequenceNo": 1,
            "name": "New stop",
            "location": {"latitude": 6.0535, "longitude": 80.221, "address": "Galle"}
        });
        let a: Stop = serde_json::from_value(json.clone()).unwrap();
        let b: Stop = serde_json::from_value(json).unwrap();

        assert!(a.id.is_temporary());
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "New stop");
    }

    #[test]
    fn test_patch_leaves_unset_fields() {
        let mut s = stop("A", 1, 6.0, 80.0);
        s.description = Some("old".to_string());

        StopPatch::default().name("Fort").apply(&mut s);
        assert_eq!(s.name, "Fort");
        assert_eq!(s.description.as_deref(), Some("old"));

        StopPatch::default().description(None).apply(&mut s);
        assert_eq!(s.description, None);
    }
}
