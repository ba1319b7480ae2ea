//! Geocode command handler
//!
//! Reverse geocodes one coordinate, falling back to a coordinate label.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::geo::mapbox::MapboxGeocoder;
use crate::geo::GeocodeClient;
use clap::Args;

/// Geocode command arguments
#[derive(Args)]
pub struct GeocodeArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Print the full address record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the geocode command
pub async fn run(args: GeocodeArgs) -> Result<()> {
    let coords = Coordinates::new(args.lat, args.lng);
    coords.validate()?;

    let config = Config::load()?;
    let client = GeocodeClient::new(MapboxGeocoder::from_config(&config)?);
    let address = client.address_for(coords).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&address)?);
    } else {
        println!("{}", address.address);
    }
    Ok(())
}
