//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "directions.profile")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    // Show path
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Reset config
    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            show_all_config(&config);
        }

        // Key only: show that value
        (Some(key), None) => {
            if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                eprintln!("Unknown config key: {}", key);
                eprintln!("\nAvailable keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                std::process::exit(1);
            }
        }

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        // Value without key: not valid
        (None, Some(_)) => {
            eprintln!("Error: Must specify a key to set a value");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[map]");
    println!("default_lat = {}", config.map.default_lat);
    println!("default_lng = {}", config.map.default_lng);
    println!("initial_zoom = {}", config.map.initial_zoom);
    println!("selected_zoom = {}", config.map.selected_zoom);
    println!("fit_padding = {}", config.map.fit_padding);
    println!("container = \"{}\"", config.map.container);
    println!();

    println!("[search]");
    println!("debounce_ms = {}", config.search.debounce_ms);
    println!("limit = {}", config.search.limit);
    println!();

    println!("[geocoding]");
    println!("base_url = \"{}\"", config.geocoding.base_url);
    println!("country = \"{}\"", config.geocoding.country);
    println!("types = \"{}\"", config.geocoding.types);
    println!("limit = {}", config.geocoding.limit);
    println!();

    println!("[directions]");
    println!("base_url = \"{}\"", config.directions.base_url);
    println!("profile = \"{}\"", config.directions.profile);
    println!("geometries = \"{}\"", config.directions.geometries);
    println!();

    println!("[network]");
    println!("timeout_secs = {}", config.network.timeout_secs);
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[api_keys]");
    if !config.api_keys.mapbox.is_empty() {
        println!("mapbox = \"***\" # configured");
    } else if config.access_token().is_some() {
        println!("mapbox = \"\" # using MAPBOX_ACCESS_TOKEN");
    } else {
        println!("mapbox = \"\" # not configured");
    }
}
