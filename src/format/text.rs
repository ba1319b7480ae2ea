//! Human-readable itinerary

use crate::error::Result;
use crate::format::{OutputFormatter, RoutePlan};
use crate::render::RouteState;

/// Text formatter - numbered stops with leg distances
pub struct TextFormatter;

fn kilometers(meters: f64) -> String {
    format!("{:.2} km", meters / 1000.0)
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable itinerary"
    }

    fn format(&self, plan: &RoutePlan) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("Tour {} ({} stops)\n\n", plan.tour_id, plan.stops.len()));

        let legs = plan.leg_distances();
        for (i, stop) in plan.stops.iter().enumerate() {
            output.push_str(&format!(
                "{:>3}. {} ({:.6}, {:.6})\n",
                stop.sequence_no, stop.name, stop.location.latitude, stop.location.longitude
            ));
            output.push_str(&format!("     {}\n", stop.location.address));
            if let Some(leg) = legs.get(i) {
                output.push_str(&format!("     ↓ {}\n", kilometers(*leg)));
            }
        }

        output.push('\n');
        match &plan.route {
            RouteState::Empty => output.push_str("Route: none (fewer than two stops)\n"),
            RouteState::Routed { geometry } | RouteState::Approximated { geometry } => {
                output.push_str(&format!(
                    "Route: {} ({}, {} points)\n",
                    kilometers(geometry.length_meters()),
                    geometry.provenance,
                    geometry.coordinates.len()
                ));
            }
        }

        Ok(output)
    }
}
