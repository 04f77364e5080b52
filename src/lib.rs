//! weathervane - address-based weather forecasts over HTTP
//!
//! This library resolves a free-text address to coordinates, fetches the
//! forecast from Open-Meteo, reshapes it into a stable client schema, and
//! caches the result for a bounded time window.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geocoding;
pub mod models;
pub mod open_meteo;
pub mod transform;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use cache::{ForecastCache, MemoryCache, cache_key};
pub use config::WeathervaneConfig;
pub use error::WeathervaneError;
pub use forecast::ForecastService;
pub use geocoding::GeocodingClient;
pub use models::{ClientForecast, ForecastMode, ForecastQuery, ForecastRequest, Location};
pub use open_meteo::OpenMeteoClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeathervaneError>;
