use stock::{CachedLoader, chart::ChartStyle};

pub mod config;
pub mod controls;
pub mod routes;

pub use routes::router;

/// Shared by every request handler.
pub struct AppState<S> {
    pub loader: CachedLoader<S>,
    pub style: ChartStyle,
    pub version: String,
}

impl<S> AppState<S> {
    pub fn new(loader: CachedLoader<S>, version: impl Into<String>) -> Self {
        Self {
            loader,
            style: ChartStyle::default(),
            version: version.into(),
        }
    }
}
