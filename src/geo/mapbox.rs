//! Mapbox geocoding backend
//!
//! Reverse lookups go to `{base}/{lng},{lat}.json`, forward search to
//! `{base}/{query}.json`. Both return a GeoJSON feature collection; for
//! reverse lookups only the first feature is used.

use crate::config::{Config, GeocodingConfig};
use crate::constants::api::USER_AGENT;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{AddressInfo, GeocodeBackend, SearchResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Mapbox geocoding backend
#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    client: reqwest::Client,
    access_token: String,
    settings: GeocodingConfig,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    place_name: String,
    /// `[lng, lat]`
    center: [f64; 2],
    #[serde(default)]
    context: Vec<ContextEntry>,
}

#[derive(Debug, Deserialize)]
struct ContextEntry {
    id: String,
    text: String,
}

impl MapboxGeocoder {
    /// Create a new Mapbox geocoder
    pub fn new(
        access_token: impl Into<String>,
        settings: GeocodingConfig,
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

    /// Create a geocoder from application config
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = config.access_token().unwrap_or_else(|| {
            warn!("No Mapbox access token configured; geocoding will degrade to fallbacks");
            String::new()
        });
        Self::new(token, config.geocoding.clone(), config.timeout())
    }

    fn reverse_url(&self, lat: f64, lng: f64) -> String {
        format!(
            "{}/{},{}.json?access_token={}&limit={}&types={}&country={}",
            self.settings.base_url,
            lng,
            lat,
            urlencoding::encode(&self.access_token),
            self.settings.limit,
            urlencoding::encode(&self.settings.types),
            urlencoding::encode(&self.settings.country),
        )
    }

    fn search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}/{}.json?access_token={}&limit={}&country={}",
            self.settings.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.access_token),
            limit,
            urlencoding::encode(&self.settings.country),
        )
    }

    async fn fetch(&self, url: &str) -> Result<FeatureCollection> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("Mapbox request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geocoding(format!(
                "Mapbox returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Geocoding(format!("Failed to parse Mapbox response: {}", e)))
    }
}

/// Administrative fields from the feature itself and its context chain
fn address_from_feature(feature: Feature) -> AddressInfo {
    let mut info = AddressInfo {
        address: feature.place_name,
        ..AddressInfo::default()
    };

    let own = ContextEntry {
        id: feature.id,
        text: feature.text,
    };
    for entry in std::iter::once(own).chain(feature.context) {
        let kind = entry.id.split('.').next().unwrap_or_default();
        let slot = match kind {
            "place" => &mut info.city,
            "district" => &mut info.district,
            "region" => &mut info.province,
            "postcode" => &mut info.postal_code,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(entry.text);
        }
    }

    info
}

fn parse_reverse(collection: FeatureCollection) -> Option<AddressInfo> {
    collection
        .features
        .into_iter()
        .next()
        .map(address_from_feature)
}

fn parse_search(collection: FeatureCollection) -> Vec<SearchResult> {
    collection
        .features
        .into_iter()
        .map(|f| SearchResult {
            id: f.id,
            label: f.text,
            full_label: f.place_name,
            center_coordinate: Coordinates::from_lng_lat(f.center),
        })
        .collect()
}

impl GeocodeBackend for MapboxGeocoder {
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Option<AddressInfo>> {
        debug!("Reverse geocoding {}, {}", lat, lng);
        let collection = self.fetch(&self.reverse_url(lat, lng)).await?;
        Ok(parse_reverse(collection))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        debug!("Searching places for {:?}", query);
        let collection = self.fetch(&self.search_url(query, limit)).await?;
        Ok(parse_search(collection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVERSE_FIXTURE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "id": "address.123",
            "type": "Feature",
            "text": "Church Street",
            "place_name": "12 Church Street, Galle 80000, Southern Province, Sri Lanka",
            "center": [80.2210, 6.0535],
            "context": [
                {"id": "postcode.1", "text": "80000"},
                {"id": "locality.2", "text": "Fort"},
                {"id": "place.3", "text": "Galle"},
                {"id": "district.4", "text": "Galle District"},
                {"id": "region.5", "text": "Southern Province"},
                {"id": "country.6", "text": "Sri Lanka"}
            ]
        }]
    }"#;

    fn geocoder() -> MapboxGeocoder {
        MapboxGeocoder::new("pk.test", GeocodingConfig::default(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_parse_reverse() {
        let collection: FeatureCollection = serde_json::from_str(REVERSE_FIXTURE).unwrap();
        let info = parse_reverse(collection).unwrap();

        assert_eq!(
            info.address,
            "12 Church Street, Galle 80000, Southern Province, Sri Lanka"
        );
        assert_eq!(info.city.as_deref(), Some("Galle"));
        assert_eq!(info.district.as_deref(), Some("Galle District"));
        assert_eq!(info.province.as_deref(), Some("Southern Province"));
        assert_eq!(info.postal_code.as_deref(), Some("80000"));
    }

    #[test]
    fn test_parse_reverse_feature_is_itself_a_place() {
        let json = r#"{"features": [{
            "id": "place.9", "text": "Galle", "place_name": "Galle, Sri Lanka",
            "center": [80.2, 6.0]
        }]}"#;
        let info = parse_reverse(serde_json::from_str(json).unwrap()).unwrap();
        assert_eq!(info.city.as_deref(), Some("Galle"));
        assert!(info.postal_code.is_none());
    }

    #[test]
    fn test_parse_reverse_empty() {
        let collection: FeatureCollection = serde_json::from_str(r#"{"features": []}"#).unwrap();
        assert!(parse_reverse(collection).is_none());
    }

    #[test]
    fn test_parse_search() {
        let collection: FeatureCollection = serde_json::from_str(REVERSE_FIXTURE).unwrap();
        let results = parse_search(collection);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, "Church Street");
        assert_eq!(results[0].center_coordinate, Coordinates::new(6.0535, 80.2210));
    }

    #[test]
    fn test_reverse_url() {
        let url = geocoder().reverse_url(6.0535, 80.221);
        assert!(url.contains("/80.221,6.0535.json?"));
        assert!(url.contains("access_token=pk.test"));
        assert!(url.contains("limit=1"));
        assert!(url.contains("country=lk"));
        assert!(url.contains("types=address%2Cpoi"));
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = geocoder().search_url("Galle Fort & Lighthouse", 5);
        assert!(url.contains("/Galle%20Fort%20%26%20Lighthouse.json?"));
        assert!(url.contains("limit=5"));
    }

    #[tokio::test]
    #[ignore = "Requires network access and a Mapbox token"]
    async fn test_live_reverse_geocode() {
        let geocoder = MapboxGeocoder::from_config(&Config::default()).unwrap();
        let info = geocoder.reverse_geocode(6.0535, 80.2210).await.unwrap();
        assert!(info.is_some());
    }
}
