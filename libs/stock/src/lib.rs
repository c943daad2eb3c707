mod bar;
mod bar_cache;
mod error;
mod loader;
mod price_client;

pub mod chart;
pub mod indicators;

pub use bar::{Bar, BarRequest};
pub use bar_cache::{BarCache, MemoryCache, RedisCache};
pub use error::DashboardError;
pub use indicators::{AugmentedRow, AugmentedTable, IndicatorConfig, compute};
pub use loader::CachedLoader;
pub use price_client::{BarSource, DEFAULT_BASE_API, PriceClient};
