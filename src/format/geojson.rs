//! GeoJSON output formatter
//!
//! One Point feature per stop, then the route LineString (if any).

use crate::error::Result;
use crate::format::{OutputFormatter, RoutePlan};
use serde_json::{json, Value};

pub struct GeoJsonFormatter;

impl GeoJsonFormatter {
    fn stop_features(plan: &RoutePlan) -> impl Iterator<Item = Value> + '_ {
        plan.stops.iter().map(|stop| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": stop.coordinates().to_lng_lat(),
                },
                "properties": {
                    "id": stop.id,
                    "sequenceNo": stop.sequence_no,
                    "name": stop.name,
                    "description": stop.description,
                    "address": stop.location.address,
                },
            })
        })
    }
}

impl OutputFormatter for GeoJsonFormatter {
    fn name(&self) -> &str {
        "geojson"
    }

    fn description(&self) -> &str {
        "GeoJSON FeatureCollection of stops and route"
    }

    fn format(&self, plan: &RoutePlan) -> Result<String> {
        let mut features: Vec<Value> = Self::stop_features(plan).collect();

        if let Some(geometry) = plan.route.geometry() {
            features.push(json!({
                "type": "Feature",
                "geometry": geometry.to_geojson(),
                "properties": {
                    "tourId": plan.tour_id,
                    "provenance": geometry.provenance,
                    "lengthMeters": geometry.length_meters(),
                },
            }));
        }

        let collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });
        Ok(serde_json::to_string_pretty(&collection)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::test_support::plan;
    use crate::render::RouteState;

    #[test]
    fn test_geojson_features() {
        let output = GeoJsonFormatter.format(&plan()).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();

        let features = parsed["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);
        // lng first
        assert_eq!(features[0]["geometry"]["coordinates"][0], 79.8428);
        assert_eq!(features[1]["properties"]["sequenceNo"], 2);
        assert_eq!(features[2]["geometry"]["type"], "LineString");
        assert_eq!(features[2]["properties"]["provenance"], "approximated");
    }

    #[test]
    fn test_geojson_without_route() {
        let mut plan = plan();
        plan.route = RouteState::Empty;
        let parsed: Value = serde_json::from_str(&GeoJsonFormatter.format(&plan).unwrap()).unwrap();
        assert_eq!(parsed["features"].as_array().unwrap().len(), 2);
    }
}
