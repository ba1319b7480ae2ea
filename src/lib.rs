//! tour-route: interactive tour-route builder
//!
//! A library and CLI for authoring the ordered stops of a walking tour on a
//! map and deriving the route that connects them.
//!
//! ## Features
//!
//! - Click-to-add stops with reverse-geocoded addresses (coordinate fallback)
//! - Stop sequence with contiguous numbering, edit, delete, and reorder
//! - Road-following routes that degrade to straight segments
//! - Debounced place search over the map
//! - Pluggable map SDK; an in-memory map drives the HTTP API and tests
//! - Route export as JSON, GeoJSON, GPX, or text
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tour_route::builder::{BuilderSettings, RouteBuilder};
//! use tour_route::directions::mapbox::MapboxDirections;
//! use tour_route::geo::mapbox::MapboxGeocoder;
//! use tour_route::map::HeadlessMap;
//! use tour_route::stop::Stop;
//! use tour_route::{Config, Coordinates};
//!
//! # async fn demo() -> tour_route::Result<()> {
//! let config = Config::load()?;
//! let mut builder = RouteBuilder::mount(
//!     "tour-42",
//!     Vec::new(),
//!     HeadlessMap::new(),
//!     Arc::new(MapboxGeocoder::from_config(&config)?),
//!     MapboxDirections::from_config(&config)?,
//!     |tour_id: &str, stops: &[Stop]| println!("{}: {} stops", tour_id, stops.len()),
//!     BuilderSettings::from_config(&config),
//! )
//! .await?;
//!
//! builder.on_surface_click(Coordinates::new(6.0535, 80.2210)).await?;
//! println!("{:?}", builder.route());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod directions;
pub mod error;
pub mod format;
pub mod geo;
pub mod lifecycle;
pub mod map;
pub mod panel;
pub mod render;
pub mod search;
pub mod server;
pub mod stop;

// Re-export commonly used types
pub use builder::{RouteBuilder, TourForm};
pub use config::Config;
pub use coord::{Bounds, Coordinates};
pub use error::{Error, Result};
pub use render::RouteState;
pub use stop::{Stop, StopId, StopSequence};
