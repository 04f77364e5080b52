//! Provider payload and client-facing forecast shapes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Unit strings keyed by series field name, e.g. `temperature_2m` → `°C`
pub type UnitMap = HashMap<String, String>;

/// Raw forecast body as the provider returns it.
///
/// Which series are present depends on what the request asked for; units
/// arrive in parallel `<series>_units` maps. Values stay [`Number`]s so the
/// provider's own textual rendering survives into the formatted output.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RawForecast {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentSeries>,
    #[serde(default, skip_serializing_if = "UnitMap::is_empty")]
    pub current_units: UnitMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily: Option<DailySeries>,
    #[serde(default, skip_serializing_if = "UnitMap::is_empty")]
    pub daily_units: UnitMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly: Option<HourlySeries>,
    #[serde(default, skip_serializing_if = "UnitMap::is_empty")]
    pub hourly_units: UnitMap,
}

/// Instantaneous conditions series
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentSeries {
    pub temperature_2m: Number,
}

/// Day-by-day series; arrays are position-aligned by index
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Number>,
    pub temperature_2m_min: Vec<Number>,
    /// Only requested for extended daily forecasts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_2m_mean: Option<Vec<Number>>,
}

/// Hour-by-hour series; arrays are position-aligned by index
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Number>,
}

/// Current conditions with readings already formatted as `<value><unit>`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: String,
    pub min_temperature: String,
    pub max_temperature: String,
}

/// One record of an extended forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ForecastPoint {
    /// One day of a daily forecast
    Daily {
        date: String,
        min_temperature: String,
        max_temperature: String,
        mean_temperature: String,
    },
    /// One hour of an hourly forecast
    Hourly { time: String, temperature: String },
}

/// Client-facing forecast payload; also the cached artifact
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientForecast {
    /// Display form of the resolved address
    pub address: String,
    /// Today's conditions, present for every mode
    pub current_forecast: CurrentConditions,
    /// Per-time-point records in provider order; absent for current-only requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_forecast: Option<Vec<ForecastPoint>>,
}
