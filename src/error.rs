//! Error types for tour-route

use thiserror::Error;

/// Main error type for tour-route operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid stop name: {0}")]
    InvalidStopName(String),

    #[error("Reorder rejected: {0}")]
    ReorderMismatch(String),

    #[error("Unknown stop: {0}")]
    UnknownStop(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Directions error: {0}")]
    Directions(String),

    #[error("Map error: {0}")]
    Map(String),

    #[error("Route builder has been torn down")]
    TornDown,
}

/// Result type alias for tour-route operations
pub type Result<T> = std::result::Result<T, Error>;
