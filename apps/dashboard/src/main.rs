use std::sync::Arc;

use anyhow::Result;
use dashboard::{AppState, config::Config, router};
use stock::{BarCache, CachedLoader, MemoryCache, PriceClient, RedisCache};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let price_client = PriceClient::new(config.yahoo_base_url.clone(), config.http_timeout)?;
    let cache = bar_cache(&config).await;
    let state = Arc::new(AppState::new(
        CachedLoader::new(price_client, cache),
        config.version.clone(),
    ));

    let listener = TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, version = %config.version, "dashboard listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete.");
    Ok(())
}

async fn bar_cache(config: &Config) -> BarCache {
    let memory = || BarCache::Memory(MemoryCache::new(config.cache_ttl, config.cache_max_entries));

    let Some(redis_url) = &config.redis_url else {
        info!(ttl_secs = config.cache_ttl.as_secs(), "using in-memory bar cache");
        return memory();
    };

    match RedisCache::new(redis_url, config.redis_key_prefix.clone(), config.cache_ttl).await {
        Ok(cache) => {
            info!(prefix = %config.redis_key_prefix, "using redis bar cache");
            BarCache::Redis(cache)
        }
        Err(e) => {
            warn!(error = ?e, "redis unavailable, falling back to in-memory bar cache");
            memory()
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::{
            select,
            signal::unix::{SignalKind, signal},
        };
        let (sigterm, sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            (Err(e), _) | (_, Err(e)) => {
                error!(error = ?e, "failed to install signal handlers, waiting for ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        let (mut sigterm, mut sigint) = (sigterm, sigint);
        select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
