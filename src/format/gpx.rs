//! GPX output formatter

use crate::error::Result;
use crate::format::{OutputFormatter, RoutePlan};

/// GPX formatter - waypoints per stop plus a track of the route
pub struct GpxFormatter;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoints and route track"
    }

    fn format(&self, plan: &RoutePlan) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="tour-route">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!("    <name>{}</name>\n", escape(&plan.tour_id)));
        gpx.push_str(&format!("    <time>{}</time>\n", chrono::Utc::now().to_rfc3339()));
        gpx.push_str("  </metadata>\n");

        for stop in &plan.stops {
            gpx.push_str(&format!(
                r#"  <wpt lat="{}" lon="{}">"#,
                stop.location.latitude, stop.location.longitude
            ));
            gpx.push('\n');
            gpx.push_str(&format!(
                "    <name>{}. {}</name>\n",
                stop.sequence_no,
                escape(&stop.name)
            ));
            if let Some(description) = &stop.description {
                gpx.push_str(&format!("    <desc>{}</desc>\n", escape(description)));
            }
            gpx.push_str(&format!("    <cmt>{}</cmt>\n", escape(&stop.location.address)));
            gpx.push_str("  </wpt>\n");
        }

        if let Some(geometry) = plan.route.geometry() {
            gpx.push_str("  <trk>\n");
            gpx.push_str(&format!("    <name>{}</name>\n", escape(&plan.tour_id)));
            gpx.push_str(&format!("    <type>{}</type>\n", geometry.provenance));
            gpx.push_str("    <trkseg>\n");
            for point in &geometry.coordinates {
                gpx.push_str(&format!(
                    "      <trkpt lat=\"{}\" lon=\"{}\"/>\n",
                    point.lat, point.lng
                ));
            }
            gpx.push_str("    </trkseg>\n");
            gpx.push_str("  </trk>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
