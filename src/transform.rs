//! Reshaping of the raw provider payload into the client-facing forecast

use serde_json::Number;

use crate::Result;
use crate::error::WeathervaneError;
use crate::models::{
    ClientForecast, CurrentConditions, DailySeries, ForecastMode, ForecastPoint, HourlySeries,
    RawForecast, UnitMap,
};

/// Build the client payload from a raw provider response.
///
/// Pure: the same inputs always produce the same payload. Today's min and max
/// always come from index 0 of the daily series, whatever the mode; the
/// extended sequence keeps the provider's series order. Fails only when a
/// series the mode requires is missing or too short.
pub fn transform(raw: &RawForecast, address: &str, mode: &ForecastMode) -> Result<ClientForecast> {
    let current = raw
        .current
        .as_ref()
        .ok_or_else(|| missing_series("current"))?;
    let daily = raw.daily.as_ref().ok_or_else(|| missing_series("daily"))?;

    let current_forecast = CurrentConditions {
        temperature: format_reading(
            &current.temperature_2m,
            unit_for(&raw.current_units, "temperature_2m"),
        ),
        min_temperature: format_reading(
            reading_at(&daily.temperature_2m_min, 0, "temperature_2m_min")?,
            unit_for(&raw.daily_units, "temperature_2m_min"),
        ),
        max_temperature: format_reading(
            reading_at(&daily.temperature_2m_max, 0, "temperature_2m_max")?,
            unit_for(&raw.daily_units, "temperature_2m_max"),
        ),
    };

    let extended_forecast = match mode {
        ForecastMode::Current => None,
        ForecastMode::Daily { .. } => Some(daily_points(daily, &raw.daily_units)?),
        ForecastMode::Hourly { .. } => {
            let hourly = raw
                .hourly
                .as_ref()
                .ok_or_else(|| missing_series("hourly"))?;
            Some(hourly_points(hourly, &raw.hourly_units)?)
        }
    };

    Ok(ClientForecast {
        address: address.to_string(),
        current_forecast,
        extended_forecast,
    })
}

/// One record per daily time point, all fields taken at the same index
fn daily_points(daily: &DailySeries, units: &UnitMap) -> Result<Vec<ForecastPoint>> {
    let means = daily
        .temperature_2m_mean
        .as_ref()
        .ok_or_else(|| missing_series("daily.temperature_2m_mean"))?;

    daily
        .time
        .iter()
        .enumerate()
        .map(|(index, date)| {
            Ok(ForecastPoint::Daily {
                date: date.clone(),
                min_temperature: format_reading(
                    reading_at(&daily.temperature_2m_min, index, "temperature_2m_min")?,
                    unit_for(units, "temperature_2m_min"),
                ),
                max_temperature: format_reading(
                    reading_at(&daily.temperature_2m_max, index, "temperature_2m_max")?,
                    unit_for(units, "temperature_2m_max"),
                ),
                mean_temperature: format_reading(
                    reading_at(means, index, "temperature_2m_mean")?,
                    unit_for(units, "temperature_2m_mean"),
                ),
            })
        })
        .collect()
}

/// One record per hourly time point
fn hourly_points(hourly: &HourlySeries, units: &UnitMap) -> Result<Vec<ForecastPoint>> {
    hourly
        .time
        .iter()
        .enumerate()
        .map(|(index, time)| {
            Ok(ForecastPoint::Hourly {
                time: time.clone(),
                temperature: format_reading(
                    reading_at(&hourly.temperature_2m, index, "temperature_2m")?,
                    unit_for(units, "temperature_2m"),
                ),
            })
        })
        .collect()
}

/// `<value><unit>` with no separator; the value keeps the provider's own
/// textual rendering and a missing unit contributes nothing
fn format_reading(value: &Number, unit: Option<&str>) -> String {
    format!("{}{}", value, unit.unwrap_or_default())
}

fn unit_for<'a>(units: &'a UnitMap, field: &str) -> Option<&'a str> {
    units.get(field).map(String::as_str)
}

fn reading_at<'a>(values: &'a [Number], index: usize, field: &str) -> Result<&'a Number> {
    values.get(index).ok_or_else(|| {
        WeathervaneError::malformed(format!("field '{field}' has no value at index {index}"))
    })
}

fn missing_series(series: &str) -> WeathervaneError {
    WeathervaneError::malformed(format!("provider response is missing '{series}'"))
}
