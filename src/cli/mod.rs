//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod geocode;
pub mod plan;
pub mod search;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Interactive tour-route builder
#[derive(Parser)]
#[command(name = "tour-route")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the route builder API server (foreground)
    Serve(serve::ServeArgs),

    /// Derive the route for a stops file and export it
    Plan(plan::PlanArgs),

    /// Reverse geocode a coordinate
    Geocode(geocode::GeocodeArgs),

    /// Search for places by name
    Search(search::SearchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Log to stderr so command output stays pipeable; `RUST_LOG` overrides
fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_logging("info");
            serve::run(args).await
        }
        Commands::Plan(args) => {
            init_logging("warn");
            plan::run(args).await
        }
        Commands::Geocode(args) => {
            init_logging("warn");
            geocode::run(args).await
        }
        Commands::Search(args) => {
            init_logging("warn");
            search::run(args).await
        }
        Commands::Config(args) => config::run(args),
    }
}
