//! Open-Meteo forecast provider client

use std::time::Duration;

use tracing::debug;

use crate::Result;
use crate::config::WeatherConfig;
use crate::error::WeathervaneError;
use crate::models::{ForecastMode, Location, RawForecast};

/// Span the provider is asked for when the client gave none
const DEFAULT_DAILY_SPAN: u32 = 3;
const DEFAULT_HOURLY_SPAN: u32 = 3;

const CURRENT_FIELDS: &str = "temperature_2m";
const DAILY_SUMMARY_FIELDS: &str = "temperature_2m_max,temperature_2m_min";
const DAILY_EXTENDED_FIELDS: &str = "temperature_2m_max,temperature_2m_min,temperature_2m_mean";
const HOURLY_FIELDS: &str = "temperature_2m";

/// Client for the Open-Meteo forecast API
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Build a client from configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| WeathervaneError::config(format!("weather client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the raw forecast for a resolved location.
    ///
    /// Transport failures become connection errors, non-2xx answers become
    /// upstream errors carrying the provider's own error text when it sent
    /// one, and an undecodable 2xx body becomes a malformed-response error.
    /// No retries.
    #[tracing::instrument(skip(self, location), fields(location_key = %location.location_key))]
    pub async fn fetch_forecast(
        &self,
        location: &Location,
        mode: &ForecastMode,
    ) -> Result<RawForecast> {
        let url = format!("{}/forecast", self.base_url);
        let params = query_params(location, mode);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WeathervaneError::connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeathervaneError::connection(e.to_string()))?;

        if !status.is_success() {
            return Err(WeathervaneError::upstream(upstream_message(
                status.as_u16(),
                &body,
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!(error = %e, "undecodable provider body");
            WeathervaneError::malformed(e.to_string())
        })
    }
}

/// Query pairs for one forecast request.
///
/// Current conditions are always requested. The daily and hourly series
/// depend on the mode: extended daily requests widen the window by one day so
/// "today" does not eat into the requested span, and hourly requests still
/// carry today's daily summary.
fn query_params(location: &Location, mode: &ForecastMode) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
        ("current", CURRENT_FIELDS.to_string()),
    ];

    match mode {
        ForecastMode::Current => {
            params.push(("daily", DAILY_SUMMARY_FIELDS.to_string()));
            params.push(("forecast_days", "1".to_string()));
        }
        ForecastMode::Daily { days } => {
            params.push(("daily", DAILY_EXTENDED_FIELDS.to_string()));
            params.push((
                "forecast_days",
                days.unwrap_or(DEFAULT_DAILY_SPAN)
                    .saturating_add(1)
                    .to_string(),
            ));
        }
        ForecastMode::Hourly { hours } => {
            params.push(("hourly", HOURLY_FIELDS.to_string()));
            params.push((
                "forecast_hours",
                hours.unwrap_or(DEFAULT_HOURLY_SPAN).to_string(),
            ));
            params.push(("daily", DAILY_SUMMARY_FIELDS.to_string()));
            params.push(("forecast_days", "1".to_string()));
        }
    }

    params
}

/// Provider-supplied error text when the body carries one, else a generic
/// status-based message
fn upstream_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("API request failed with status {status}"))
}
