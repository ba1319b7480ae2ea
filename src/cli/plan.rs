//! Plan command handler
//!
//! Reads a stops file, derives the route, and writes it in an export format.

use crate::config::Config;
use crate::directions::mapbox::MapboxDirections;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, RoutePlan};
use crate::stop::Stop;
use clap::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Plan command arguments
#[derive(Args)]
pub struct PlanArgs {
    /// JSON file: an array of stops, or an object with a "stops" array
    pub file: PathBuf,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Tour identifier (defaults to the file stem)
    #[arg(long)]
    pub tour_id: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StopsFile {
    Bare(Vec<Stop>),
    Wrapped { stops: Vec<Stop> },
}

/// Parse a stops file body
pub fn parse_stops(json: &str) -> Result<Vec<Stop>> {
    let stops = match serde_json::from_str::<StopsFile>(json)? {
        StopsFile::Bare(stops) | StopsFile::Wrapped { stops } => stops,
    };
    for stop in &stops {
        stop.coordinates().validate()?;
    }
    Ok(stops)
}

fn tour_id_for(args_tour_id: Option<String>, file: &Path) -> String {
    args_tour_id.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "tour".to_string())
    })
}

/// Run the plan command
pub async fn run(args: PlanArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let format = args.format.as_deref().unwrap_or("text");
    let formatter = get_formatter(format).ok_or_else(|| {
        Error::Config(format!(
            "Unknown format: {}. Use --list-formats to see options.",
            format
        ))
    })?;

    let stops = parse_stops(&std::fs::read_to_string(&args.file)?)?;
    let tour_id = tour_id_for(args.tour_id, &args.file);

    let config = Config::load()?;
    let directions = MapboxDirections::from_config(&config)?;
    let plan = RoutePlan::derive(tour_id, stops, &directions).await;
    let output = formatter.format(&plan)?;

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        info!("Wrote {} plan to {}", formatter.name(), path.display());
        eprintln!("Output written to {}", path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for info in available_formats() {
        println!("  {:<10} {}", info.name, info.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const STOP: &str = r#"{
        "id": "s1",
        "sequenceNo": 1,
        "name": "Galle Fort",
        "location": {"latitude": 6.0267, "longitude": 80.2170, "address": "Galle"}
    }"#;

    #[test]
    fn test_parse_bare_and_wrapped() {
        let bare = parse_stops(&format!("[{}]", STOP)).unwrap();
        let wrapped = parse_stops(&format!(r#"{{"stops": [{}]}}"#, STOP)).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].name, "Galle Fort");
        assert_eq!(bare[0].description, None);
    }

    #[test]
    fn test_parse_rejects_bad_coordinates() {
        let bad = STOP.replace("6.0267", "123.0");
        assert!(matches!(
            parse_stops(&format!("[{}]", bad)),
            Err(Error::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_tour_id_defaults_to_file_stem() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[]").unwrap();
        let stem = file.path().file_stem().unwrap().to_string_lossy().to_string();

        assert_eq!(tour_id_for(None, file.path()), stem);
        assert_eq!(tour_id_for(Some("x".to_string()), file.path()), "x");
    }
}
