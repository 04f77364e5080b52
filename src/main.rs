use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weathervane::{AppState, ForecastService, VERSION, WeathervaneConfig, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = WeathervaneConfig::load()?;

    // RUST_LOG wins over the configured level when set
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "weathervane={},tower_http=info",
                config.logging.level
            ))
        }))
        .init();

    info!("weathervane v{} starting", VERSION);
    info!(
        host = %config.server.host,
        port = config.server.port,
        geocoder = %config.geocoding.base_url,
        provider = %config.weather.base_url,
        cache_ttl_minutes = config.cache.ttl_minutes,
        "configuration loaded"
    );

    let service = ForecastService::new(&config)?;
    let state = AppState {
        service: Arc::new(service),
    };

    web::run(&config.server, state).await
}
