use anyhow::Result;
use tracing::{debug, info, info_span, instrument};
use tracing_futures::Instrument;

use crate::{Bar, BarCache, BarRequest, BarSource};

/// A [`BarSource`] fronted by a memoization cache keyed on the request.
pub struct CachedLoader<S> {
    source: S,
    cache: BarCache,
}

impl<S: BarSource> CachedLoader<S> {
    pub fn new(source: S, cache: BarCache) -> Self {
        Self { source, cache }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Loads bars for `request`, serving repeats from the cache.
    ///
    /// Empty results are returned but not cached.
    #[instrument(name = "load_bars", skip(self), fields(ticker = %request.ticker, start = %request.start, end = %request.end))]
    pub async fn load(&self, request: &BarRequest) -> Result<Vec<Bar>> {
        let key = request.cache_key();

        if let Some(bars) = self.cache.get(&key).await {
            debug!(bars = bars.len(), "cache hit");
            return Ok(bars);
        }

        let span = info_span!("fetch_bars", key = %key);
        let bars = self.source.fetch_bars(request).instrument(span).await?;
        info!(bars = bars.len(), "fetched price bars");

        if !bars.is_empty() {
            self.cache.put(&key, &bars).await;
        }
        Ok(bars)
    }
}
