//! Data models for the weathervane service
//!
//! Organized by concern:
//! - Location: a geocoded address with its cache identifier
//! - Params: raw query input and the validated request
//! - Forecast: provider payload and client-facing shapes

pub mod forecast;
pub mod location;
pub mod params;

// Re-export all public types for convenient access
pub use forecast::{
    ClientForecast, CurrentConditions, CurrentSeries, DailySeries, ForecastPoint, HourlySeries,
    RawForecast, UnitMap,
};
pub use location::Location;
pub use params::{ForecastMode, ForecastQuery, ForecastRequest};
