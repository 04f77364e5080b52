//! Resolved location for a forecast request

use serde::{Deserialize, Serialize};

/// A geocoded address
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Full display form of the resolved address
    pub display_name: String,
    /// Stable short identifier used in cache keys (postal code when available)
    pub location_key: String,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(
        latitude: f64,
        longitude: f64,
        display_name: impl Into<String>,
        location_key: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            display_name: display_name.into(),
            location_key: location_key.into(),
        }
    }

    /// Fallback cache-key identifier for locations without a postal code
    #[must_use]
    pub fn coordinate_key(latitude: f64, longitude: f64) -> String {
        format!("{latitude:.4},{longitude:.4}")
    }
}
