//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/tour-route/config.toml

pub mod defaults;

use crate::constants::api::ACCESS_TOKEN_ENV;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Map viewport and camera settings
    #[serde(default)]
    pub map: MapConfig,

    /// Place search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Reverse geocoding settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Directions settings
    #[serde(default)]
    pub directions: DirectionsConfig,

    /// Outbound HTTP settings
    #[serde(default)]
    pub network: NetworkConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Map viewport and camera settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Latitude the map starts at (and recenters to on an empty search)
    #[serde(default = "default_lat")]
    pub default_lat: f64,

    /// Longitude the map starts at (and recenters to on an empty search)
    #[serde(default = "default_lng")]
    pub default_lng: f64,

    /// Zoom level when the viewport is created
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f64,

    /// Zoom level when a single stop or search result is focused
    #[serde(default = "default_selected_zoom")]
    pub selected_zoom: f64,

    /// Padding in pixels for fit-to-bounds
    #[serde(default = "default_fit_padding")]
    pub fit_padding: f64,

    /// Container the viewport is mounted into
    #[serde(default = "default_container")]
    pub container: String,
}

/// Place search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Debounce interval after the last keystroke
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum candidates listed
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

/// Reverse geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Geocoding API base URL
    #[serde(default = "default_geocoding_url")]
    pub base_url: String,

    /// ISO country filter
    #[serde(default = "default_country")]
    pub country: String,

    /// Feature types requested
    #[serde(default = "default_geocode_types")]
    pub types: String,

    /// Number of features requested
    #[serde(default = "default_geocode_limit")]
    pub limit: usize,
}

/// Directions settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsConfig {
    /// Directions API base URL
    #[serde(default = "default_directions_url")]
    pub base_url: String,

    /// Routing profile (walking, cycling, driving)
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Geometry format requested
    #[serde(default = "default_geometries")]
    pub geometries: String,
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Mapbox access token
    #[serde(default)]
    pub mapbox: String,
}

// Default value functions for serde
fn default_lat() -> f64 {
    DEFAULT_LAT
}
fn default_lng() -> f64 {
    DEFAULT_LNG
}
fn default_initial_zoom() -> f64 {
    DEFAULT_INITIAL_ZOOM
}
fn default_selected_zoom() -> f64 {
    DEFAULT_SELECTED_ZOOM
}
fn default_fit_padding() -> f64 {
    DEFAULT_FIT_PADDING
}
fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}
fn default_geocoding_url() -> String {
    crate::constants::api::MAPBOX_GEOCODING_URL.to_string()
}
fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}
fn default_geocode_types() -> String {
    DEFAULT_GEOCODE_TYPES.to_string()
}
fn default_geocode_limit() -> usize {
    DEFAULT_GEOCODE_LIMIT
}
fn default_directions_url() -> String {
    crate::constants::api::MAPBOX_DIRECTIONS_URL.to_string()
}
fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}
fn default_geometries() -> String {
    DEFAULT_GEOMETRIES.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_lat: default_lat(),
            default_lng: default_lng(),
            initial_zoom: default_initial_zoom(),
            selected_zoom: default_selected_zoom(),
            fit_padding: default_fit_padding(),
            container: default_container(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            limit: default_search_limit(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_url(),
            country: default_country(),
            types: default_geocode_types(),
            limit: default_geocode_limit(),
        }
    }
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: default_directions_url(),
            profile: default_profile(),
            geometries: default_geometries(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["map", "default_lat"] => Some(self.map.default_lat.to_string()),
            ["map", "default_lng"] => Some(self.map.default_lng.to_string()),
            ["map", "initial_zoom"] => Some(self.map.initial_zoom.to_string()),
            ["map", "selected_zoom"] => Some(self.map.selected_zoom.to_string()),
            ["map", "fit_padding"] => Some(self.map.fit_padding.to_string()),
            ["map", "container"] => Some(self.map.container.clone()),

            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),
            ["search", "limit"] => Some(self.search.limit.to_string()),

            ["geocoding", "base_url"] => Some(self.geocoding.base_url.clone()),
            ["geocoding", "country"] => Some(self.geocoding.country.clone()),
            ["geocoding", "types"] => Some(self.geocoding.types.clone()),
            ["geocoding", "limit"] => Some(self.geocoding.limit.to_string()),

            ["directions", "base_url"] => Some(self.directions.base_url.clone()),
            ["directions", "profile"] => Some(self.directions.profile.clone()),
            ["directions", "geometries"] => Some(self.directions.geometries.clone()),

            ["network", "timeout_secs"] => Some(self.network.timeout_secs.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["api_keys", "mapbox"] => Some(self.api_keys.mapbox.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["map", "default_lat"] => self.map.default_lat = parse_value(key, value)?,
            ["map", "default_lng"] => self.map.default_lng = parse_value(key, value)?,
            ["map", "initial_zoom"] => self.map.initial_zoom = parse_value(key, value)?,
            ["map", "selected_zoom"] => self.map.selected_zoom = parse_value(key, value)?,
            ["map", "fit_padding"] => self.map.fit_padding = parse_value(key, value)?,
            ["map", "container"] => self.map.container = value.to_string(),

            ["search", "debounce_ms"] => self.search.debounce_ms = parse_value(key, value)?,
            ["search", "limit"] => self.search.limit = parse_value(key, value)?,

            ["geocoding", "base_url"] => self.geocoding.base_url = value.to_string(),
            ["geocoding", "country"] => self.geocoding.country = value.to_string(),
            ["geocoding", "types"] => self.geocoding.types = value.to_string(),
            ["geocoding", "limit"] => self.geocoding.limit = parse_value(key, value)?,

            ["directions", "base_url"] => self.directions.base_url = value.to_string(),
            ["directions", "profile"] => self.directions.profile = value.to_string(),
            ["directions", "geometries"] => self.directions.geometries = value.to_string(),

            ["network", "timeout_secs"] => self.network.timeout_secs = parse_value(key, value)?,

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            ["api_keys", "mapbox"] => self.api_keys.mapbox = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "map.default_lat",
            "map.default_lng",
            "map.initial_zoom",
            "map.selected_zoom",
            "map.fit_padding",
            "map.container",
            "search.debounce_ms",
            "search.limit",
            "geocoding.base_url",
            "geocoding.country",
            "geocoding.types",
            "geocoding.limit",
            "directions.base_url",
            "directions.profile",
            "directions.geometries",
            "network.timeout_secs",
            "server.host",
            "server.port",
            "api_keys.mapbox",
        ]
    }

    /// Location the map starts at and recenters to
    pub fn default_center(&self) -> Coordinates {
        Coordinates::new(self.map.default_lat, self.map.default_lng)
    }

    /// Search debounce interval
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Outbound request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout_secs)
    }

    /// Mapbox access token, falling back to the environment when unset
    pub fn access_token(&self) -> Option<String> {
        if !self.api_keys.mapbox.is_empty() {
            return Some(self.api_keys.mapbox.clone());
        }
        std::env::var(ACCESS_TOKEN_ENV).ok().filter(|t| !t.is_empty())
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}
