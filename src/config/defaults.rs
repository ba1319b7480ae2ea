//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default map center latitude (Colombo)
pub const DEFAULT_LAT: f64 = 6.9271;

/// Default map center longitude (Colombo)
pub const DEFAULT_LNG: f64 = 79.8612;

/// Zoom level used when the map is first created
pub const DEFAULT_INITIAL_ZOOM: f64 = 12.0;

/// Zoom level used when focusing a selected stop or search result
pub const DEFAULT_SELECTED_ZOOM: f64 = 15.0;

/// Padding in pixels applied when fitting the camera to all stops
pub const DEFAULT_FIT_PADDING: f64 = 50.0;

/// Default map container id
pub const DEFAULT_CONTAINER: &str = "route-map";

/// Search debounce interval in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Maximum number of search candidates listed
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Country filter for geocoding queries
pub const DEFAULT_COUNTRY: &str = "lk";

/// Feature types requested from reverse geocoding
pub const DEFAULT_GEOCODE_TYPES: &str = "address,poi,place,locality,neighborhood";

/// Number of reverse geocoding features requested (only the first is used)
pub const DEFAULT_GEOCODE_LIMIT: usize = 1;

/// Directions routing profile
pub const DEFAULT_PROFILE: &str = "walking";

/// Directions geometry format
pub const DEFAULT_GEOMETRIES: &str = "geojson";

/// Outbound HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "tour-route";
