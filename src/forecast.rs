//! Forecast pipeline: validation, resolution, cache, provider, transform

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::Result;
use crate::cache::{ForecastCache, MemoryCache, cache_key};
use crate::config::WeathervaneConfig;
use crate::geocoding::GeocodingClient;
use crate::models::{ClientForecast, ForecastQuery, ForecastRequest};
use crate::open_meteo::OpenMeteoClient;
use crate::transform::transform;

/// Runs one forecast request end to end.
///
/// The pipeline is strictly ordered: hard validation, address resolution,
/// cache lookup, provider fetch, transform, cache write. Validation and
/// resolution failures short-circuit before any provider call; nothing is
/// ever cached on a failure path.
pub struct ForecastService {
    geocoder: GeocodingClient,
    provider: OpenMeteoClient,
    cache: Arc<dyn ForecastCache>,
    cache_ttl: Duration,
}

impl ForecastService {
    /// Wire the service from configuration with the in-memory cache backend
    pub fn new(config: &WeathervaneConfig) -> Result<Self> {
        let cache = Arc::new(MemoryCache::new(
            config.cache.ttl(),
            config.cache.max_entries,
        ));
        Self::with_cache(config, cache)
    }

    /// Wire the service with an injected cache backend
    pub fn with_cache(config: &WeathervaneConfig, cache: Arc<dyn ForecastCache>) -> Result<Self> {
        Ok(Self {
            geocoder: GeocodingClient::new(&config.geocoding)?,
            provider: OpenMeteoClient::new(&config.weather)?,
            cache,
            cache_ttl: config.cache.ttl(),
        })
    }

    /// Validate raw query input and run the pipeline
    pub async fn forecast(&self, query: &ForecastQuery) -> Result<ClientForecast> {
        let request = ForecastRequest::from_query(query)?;
        self.run(&request).await
    }

    #[tracing::instrument(skip(self, request), fields(address = %request.address))]
    async fn run(&self, request: &ForecastRequest) -> Result<ClientForecast> {
        let location = self.geocoder.resolve(&request.address).await?;
        let key = cache_key(&location, &request.mode);

        if let Some(cached) = self.cached(&key).await {
            info!(key, "forecast served from cache");
            return Ok(cached);
        }

        debug!(key, "cache miss, fetching from provider");
        let raw = self.provider.fetch_forecast(&location, &request.mode).await?;
        let payload = transform(&raw, &location.display_name, &request.mode)?;

        if let Err(error) = self
            .cache
            .write(&key, payload.clone(), self.cache_ttl)
            .await
        {
            warn!(key, %error, "failed to cache forecast");
        }

        Ok(payload)
    }

    /// Cache lookup that treats backend errors as misses
    async fn cached(&self, key: &str) -> Option<ClientForecast> {
        match self.cache.read(key).await {
            Ok(hit) => hit,
            Err(error) => {
                warn!(key, %error, "cache read failed, treating as miss");
                None
            }
        }
    }
}
