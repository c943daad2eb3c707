use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use anyhow::Error;
use fred::{prelude::*, types::Expiration};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::Bar;

/// Memoizes loader results by request key.
///
/// Nothing here is needed for correctness; failures degrade to misses.
pub enum BarCache {
    Memory(MemoryCache),
    Redis(RedisCache),
}

impl BarCache {
    pub async fn get(&self, key: &str) -> Option<Vec<Bar>> {
        match self {
            BarCache::Memory(cache) => cache.get(key),
            BarCache::Redis(cache) => match cache.get(key).await {
                Ok(bars) => bars,
                Err(e) => {
                    warn!(error = ?e, key, "redis cache read failed");
                    None
                }
            },
        }
    }

    pub async fn put(&self, key: &str, bars: &[Bar]) {
        match self {
            BarCache::Memory(cache) => cache.put(key, bars),
            BarCache::Redis(cache) => {
                if let Err(e) = cache.put(key, bars).await {
                    warn!(error = ?e, key, "redis cache write failed");
                }
            }
        }
    }
}

struct Entry {
    bars: Vec<Bar>,
    stored_at: Instant,
}

/// In-process cache with a time-to-live and an entry cap.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<Bar>> {
        let mut entries = self.entries.lock();
        let fresh = entries.get(key)?.stored_at.elapsed() < self.ttl;
        if !fresh {
            debug!(key, "cache entry expired");
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|e| e.bars.clone())
    }

    pub fn put(&self, key: &str, bars: &[Bar]) {
        let mut entries = self.entries.lock();
        let ttl = self.ttl;
        entries.retain(|_, e| e.stored_at.elapsed() < ttl);

        if entries.len() >= self.max_entries && !entries.contains_key(key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key.to_string(),
            Entry {
                bars: bars.to_vec(),
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const REDIS_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared cache in Redis, JSON-encoded with an expiry.
#[derive(Clone)]
pub struct RedisCache {
    client: Client,
    key_prefix: String,
    ttl: Duration,
}

impl RedisCache {
    /// Connects to `redis_url`; keys are namespaced under `key_prefix`.
    pub async fn new(
        redis_url: &str,
        key_prefix: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, Error> {
        let client = Builder::from_config(Config::from_url(redis_url)?)
            .with_connection_config(|conn| {
                conn.connection_timeout = REDIS_TIMEOUT;
                conn.internal_command_timeout = REDIS_TIMEOUT;
            })
            .set_policy(ReconnectPolicy::new_exponential(0, 100, 10_000, 2))
            .build()?;

        client.on_error(|(e, server)| async move {
            warn!(?server, error = %e, "redis cache connection error");
            Ok(())
        });
        client.init().await?;
        debug!("redis cache connected");

        Ok(Self {
            client,
            key_prefix: key_prefix.into(),
            ttl,
        })
    }

    fn bars_key(&self, key: &str) -> String {
        format!("{}:bars:{}", self.key_prefix, key)
    }

    pub async fn get(&self, key: &str) -> Result<Option<Vec<Bar>>, Error> {
        let raw: Option<String> = self.client.get(self.bars_key(key)).await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(Error::from)
    }

    pub async fn put(&self, key: &str, bars: &[Bar]) -> Result<(), Error> {
        let json = serde_json::to_string(bars)?;
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX).max(1);

        let _: () = self
            .client
            .set(self.bars_key(key), json, Some(Expiration::EX(ttl)), None, false)
            .await?;

        Ok(())
    }
}
