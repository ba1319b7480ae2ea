//! Mapbox directions backend
//!
//! Request: `{base}/{profile}/{lng,lat;lng,lat;...}?geometries=geojson`.
//! A response without `routes` (or with an empty list) means no route.

use crate::config::{Config, DirectionsConfig};
use crate::constants::api::USER_AGENT;
use crate::coord::Coordinates;
use crate::directions::DirectionsBackend;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Mapbox directions backend
#[derive(Debug, Clone)]
pub struct MapboxDirections {
    client: reqwest::Client,
    access_token: String,
    settings: DirectionsConfig,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Option<Vec<Route>>,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Route {
    geometry: LineString,
}

#[derive(Debug, Deserialize)]
struct LineString {
    coordinates: Vec<[f64; 2]>,
}

impl MapboxDirections {
    /// Create a new Mapbox directions client
    pub fn new(
        access_token: impl Into<String>,
        settings: DirectionsConfig,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.into(),
            settings,
        })
    }

    /// Create a directions client from application config
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.access_token().unwrap_or_else(|| {
            warn!("No Mapbox access token configured; routes will be approximated");
            String::new()
        });
        Self::new(token, config.directions.clone(), config.timeout())
    }

    fn route_url(&self, waypoints: &[Coordinates]) -> String {
        let joined = waypoints
            .iter()
            .map(|c| format!("{},{}", c.lng, c.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/{}/{}?geometries={}&overview=full&access_token={}",
            self.settings.base_url,
            self.settings.profile,
            joined,
            urlencoding::encode(&self.settings.geometries),
            urlencoding::encode(&self.access_token),
        )
    }
}

fn first_route(response: DirectionsResponse) -> Option<Vec<Coordinates>> {
    let route = response.routes?.into_iter().next()?;
    Some(
        route
            .geometry
            .coordinates
            .into_iter()
            .map(Coordinates::from_lng_lat)
            .collect(),
    )
}

impl DirectionsBackend for MapboxDirections {
    async fn route(&self, waypoints: &[Coordinates]) -> Result<Option<Vec<Coordinates>>> {
        debug!("Requesting directions through {} waypoints", waypoints.len());

        let response = self
            .client
            .get(self.route_url(waypoints))
            .send()
            .await
            .map_err(|e| Error::Directions(format!("Mapbox request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Directions(format!(
                "Mapbox returned status: {}",
                response.status()
            )));
        }

        let body: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| Error::Directions(format!("Failed to parse Mapbox response: {}", e)))?;

        if let Some(code) = &body.code {
            debug!("Directions response code: {}", code);
        }

        Ok(first_route(body))
    }
}
