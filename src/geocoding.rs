//! Address resolution through a Nominatim-style geocoding API

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::Result;
use crate::config::GeocodingConfig;
use crate::error::WeathervaneError;
use crate::models::Location;

/// Sent with every request; the public Nominatim instance requires one
const GEOCODER_USER_AGENT: &str = concat!("weathervane/", env!("CARGO_PKG_VERSION"));

/// One search match from the geocoder
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: PlaceAddress,
}

/// Address details of a match; only the postcode matters here
#[derive(Debug, Default, Deserialize)]
struct PlaceAddress {
    postcode: Option<String>,
}

/// Client for the geocoding collaborator
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodingClient {
    /// Build a client from configuration
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(GEOCODER_USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| WeathervaneError::config(format!("geocoding client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a free-text address to a location. The first match wins.
    ///
    /// Zero matches fail with [`WeathervaneError::LocationNotFound`]; a failing
    /// call or an undecodable body fails as a geocoding error carrying the
    /// cause. One provider call per invocation, no retries.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, address: &str) -> Result<Location> {
        let url = format!(
            "{}/search?q={}&format=json&addressdetails=1&limit=1",
            self.base_url,
            urlencoding::encode(address)
        );

        let places: Vec<Place> = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeathervaneError::geocoding(e.to_string()))?
            .error_for_status()
            .map_err(|e| WeathervaneError::geocoding(e.to_string()))?
            .json()
            .await
            .map_err(|e| WeathervaneError::geocoding(e.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            debug!(address, "geocoder returned no matches");
            return Err(WeathervaneError::LocationNotFound);
        };

        let location = location_from_place(place)?;
        debug!(
            location_key = %location.location_key,
            display_name = %location.display_name,
            "resolved address"
        );
        Ok(location)
    }
}

/// Convert a geocoder match into a [`Location`].
///
/// The location key is the postcode when the match carries one, else the
/// rounded coordinates.
fn location_from_place(place: Place) -> Result<Location> {
    let latitude: f64 = place
        .lat
        .parse()
        .map_err(|_| WeathervaneError::geocoding(format!("invalid latitude '{}'", place.lat)))?;
    let longitude: f64 = place
        .lon
        .parse()
        .map_err(|_| WeathervaneError::geocoding(format!("invalid longitude '{}'", place.lon)))?;

    let location_key = place
        .address
        .postcode
        .filter(|postcode| !postcode.trim().is_empty())
        .unwrap_or_else(|| Location::coordinate_key(latitude, longitude));

    Ok(Location::new(
        latitude,
        longitude,
        place.display_name,
        location_key,
    ))
}
