//! tour-route CLI entry point
//!
//! Interactive tour-route builder - CLI + HTTP API

use tour_route::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
