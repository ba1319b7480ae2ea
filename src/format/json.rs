//! JSON output formatter

use crate::error::Result;
use crate::format::{OutputFormatter, RoutePlan};

/// JSON formatter - outputs the full plan as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON plan"
    }

    fn format(&self, plan: &RoutePlan) -> Result<String> {
        Ok(serde_json::to_string_pretty(plan)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::test_support::plan;

    #[test]
    fn test_json_format() {
        let output = JsonFormatter.format(&plan()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["tour_id"], "south-coast");
        assert_eq!(parsed["stops"][0]["sequenceNo"], 1);
        assert_eq!(parsed["route"]["state"], "approximated");
    }

    #[test]
    fn test_json_round_trips_into_plan() {
        let output = JsonFormatter.format(&plan()).unwrap();
        let back: RoutePlan = serde_json::from_str(&output).unwrap();
        assert_eq!(back, plan());
    }
}
