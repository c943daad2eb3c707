use std::{env::var, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Result, anyhow};
use stock::DEFAULT_BASE_API;

/// Process settings. User inputs never come from here.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub yahoo_base_url: String,
    pub http_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
    pub version: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            addr: parse_var("DASHBOARD_ADDR", or("DASHBOARD_ADDR", "127.0.0.1:8501"))?,
            yahoo_base_url: or("YAHOO_BASE_URL", DEFAULT_BASE_API),
            http_timeout: Duration::from_secs(parse_var(
                "HTTP_TIMEOUT_SECS",
                or("HTTP_TIMEOUT_SECS", "10"),
            )?),
            cache_ttl: Duration::from_secs(parse_var(
                "CACHE_TTL_SECS",
                or("CACHE_TTL_SECS", "3600"),
            )?),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES", or("CACHE_MAX_ENTRIES", "256"))?,
            redis_url: get("REDIS_URL"),
            redis_key_prefix: or("REDIS_KEY_PREFIX", "dashboard"),
            version: or("APP_VERSION", "Unknown"),
        })
    }
}

fn parse_var<T>(name: &str, value: String) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow!("{name} has an invalid value {value:?}: {e}"))
}
