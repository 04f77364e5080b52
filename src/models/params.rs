//! Forecast request parameters and boundary validation

use serde::Deserialize;

use crate::Result;
use crate::error::WeathervaneError;

/// Raw query-string input as it arrives on the wire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastQuery {
    pub address: Option<String>,
    pub forecast_type: Option<String>,
    pub forecast_days: Option<String>,
    pub forecast_hours: Option<String>,
}

/// Requested forecast granularity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForecastMode {
    /// No forecast type requested: current conditions only
    Current,
    /// Extended day-by-day forecast over an optional span of days
    Daily { days: Option<u32> },
    /// Extended hour-by-hour forecast over an optional span of hours
    Hourly { hours: Option<u32> },
}

impl ForecastMode {
    /// Mode label as it appears in cache keys
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ForecastMode::Current => "current",
            ForecastMode::Daily { .. } => "daily",
            ForecastMode::Hourly { .. } => "hourly",
        }
    }

    /// The requested span, when the client gave a usable one
    #[must_use]
    pub fn count(&self) -> Option<u32> {
        match self {
            ForecastMode::Current => None,
            ForecastMode::Daily { days } => *days,
            ForecastMode::Hourly { hours } => *hours,
        }
    }
}

/// A forecast request that passed hard validation
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    /// Free-text address to resolve
    pub address: String,
    /// Requested granularity with its span
    pub mode: ForecastMode,
}

const ADDRESS_REQUIRED: &str = "Address is required.";
const INVALID_FORECAST_TYPE: &str = "Forecast type must be either 'daily' or 'hourly'.";

impl ForecastRequest {
    /// Validate raw query input, collecting every violation before failing.
    ///
    /// The address must be non-blank and `forecast_type`, when given, must be
    /// exactly `daily` or `hourly`. Span inputs are coerced leniently here:
    /// blank or non-numeric values count as "not given" and fall back to the
    /// provider defaults later in the pipeline.
    pub fn from_query(query: &ForecastQuery) -> Result<Self> {
        let mut errors = Vec::new();

        let address = query.address.as_deref().unwrap_or_default().trim();
        if address.is_empty() {
            errors.push(ADDRESS_REQUIRED.to_string());
        }

        let mode = match query.forecast_type.as_deref().map(str::trim) {
            None | Some("") => ForecastMode::Current,
            Some("daily") => ForecastMode::Daily {
                days: parse_span(query.forecast_days.as_deref()),
            },
            Some("hourly") => ForecastMode::Hourly {
                hours: parse_span(query.forecast_hours.as_deref()),
            },
            Some(_) => {
                errors.push(INVALID_FORECAST_TYPE.to_string());
                ForecastMode::Current
            }
        };

        if !errors.is_empty() {
            return Err(WeathervaneError::invalid_parameters(errors));
        }

        Ok(Self {
            address: address.to_string(),
            mode,
        })
    }
}

/// Lenient span coercion: blank or non-numeric input means "not given"
fn parse_span(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|value| value.trim().parse().ok())
}
