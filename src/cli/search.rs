//! Search command handler

use crate::config::Config;
use crate::error::Result;
use crate::geo::mapbox::MapboxGeocoder;
use crate::geo::GeocodeBackend;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place name to look up
    pub query: String,

    /// Maximum results (defaults to search.limit)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let limit = args.limit.unwrap_or(config.search.limit);
    let geocoder = MapboxGeocoder::from_config(&config)?;

    let results = geocoder.search(args.query.trim(), limit).await?;
    if results.is_empty() {
        println!("No places found for {:?}", args.query);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!(
            "{:>2}. {} ({:.6}, {:.6})",
            i + 1,
            result.full_label,
            result.center_coordinate.lat,
            result.center_coordinate.lng
        );
    }
    Ok(())
}
