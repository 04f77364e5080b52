//! Forecast cache: key derivation and the time-bounded store

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::Result;
use crate::models::{ClientForecast, ForecastMode, Location};

/// Derive the cache key for a resolved location and requested mode.
///
/// The key is the location key, the mode label (the sentinel `current` when no
/// forecast type was requested), and the requested span when one was given,
/// joined with `_`. Identical inputs always produce identical keys.
#[must_use]
pub fn cache_key(location: &Location, mode: &ForecastMode) -> String {
    let mut parts = vec![location.location_key.clone(), mode.label().to_string()];
    if let Some(count) = mode.count() {
        parts.push(count.to_string());
    }
    parts.join("_")
}

/// Key→payload store shared by all in-flight requests.
///
/// Injected into the pipeline so tests can substitute their own instance.
/// Backends must be safe under concurrent reads and writes.
#[async_trait]
pub trait ForecastCache: Send + Sync {
    /// Look up a previously stored payload; `None` on miss or expiry
    async fn read(&self, key: &str) -> Result<Option<ClientForecast>>;

    /// Store a payload under `key` for `ttl`
    async fn write(&self, key: &str, payload: ClientForecast, ttl: Duration) -> Result<()>;
}

/// In-memory TTL cache backed by moka
pub struct MemoryCache {
    entries: Cache<String, ClientForecast>,
}

impl MemoryCache {
    /// Create a store whose entries expire `ttl` after they are written
    #[must_use]
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }
}

#[async_trait]
impl ForecastCache for MemoryCache {
    async fn read(&self, key: &str) -> Result<Option<ClientForecast>> {
        let hit = self.entries.get(key).await;
        debug!(key, hit = hit.is_some(), "cache read");
        Ok(hit)
    }

    async fn write(&self, key: &str, payload: ClientForecast, _ttl: Duration) -> Result<()> {
        // moka expires entries with the store-level TTL it was built with;
        // every caller writes with that same fixed TTL
        self.entries.insert(key.to_string(), payload).await;
        debug!(key, "cache write");
        Ok(())
    }
}
