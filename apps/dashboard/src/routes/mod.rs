mod api;
mod chart;
mod dashboard;
mod error;

use std::sync::Arc;

use axum::{Router, routing::get};
use stock::{AugmentedTable, BarRequest, BarSource, DashboardError, compute};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

use crate::{
    AppState,
    controls::{Controls, DAILY_MINUTES},
};

pub use error::ApiError;

pub fn router<S: BarSource + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(dashboard::page::<S>))
        .route("/chart.png", get(chart::png::<S>))
        .route("/api/indicators", get(api::indicators::<S>))
        .route("/health", get(api::health::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Validate, load and compute for one set of sidebar inputs.
#[instrument(
    name = "build_table",
    skip(state, controls),
    fields(ticker = %controls.ticker, start = %controls.start, end = %controls.end)
)]
pub(crate) async fn build_table<S: BarSource>(
    state: &AppState<S>,
    controls: &Controls,
) -> Result<(BarRequest, AugmentedTable), DashboardError> {
    let request = controls.bar_request()?;
    let config = controls.indicator_config()?;

    if controls.kbar_minutes != DAILY_MINUTES {
        debug!(
            kbar_minutes = controls.kbar_minutes,
            "k-line duration is not applied; bars stay daily"
        );
    }

    let bars = match state.loader.load(&request).await {
        Ok(bars) => bars,
        Err(e) => {
            warn!(error = ?e, "load failed");
            return Err(DashboardError::data_unavailable(&request.ticker));
        }
    };

    if bars.is_empty() {
        info!("no bars in range");
        return Err(DashboardError::data_unavailable(&request.ticker));
    }

    let table = compute(&bars, &config);
    debug!(rows = table.len(), "computed indicators");
    Ok((request, table))
}
