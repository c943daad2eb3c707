use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};
use stock::{
    BarSource, DashboardError,
    chart::{compose, render_png},
};
use tracing::{debug, info};

use super::{ApiError, build_table};
use crate::{AppState, controls::Controls};

const WIDTH: u32 = 1400;
const HEIGHT: u32 = 700;

pub async fn png<S: BarSource>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<Controls>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(controls) = query.map_err(|r| DashboardError::invalid_config(r.body_text()))?;
    let (request, table) = build_table(&state, &controls).await?;
    let ticker = request.ticker.clone();
    let style = state.style.clone();

    debug!("generating chart (spawn_blocking)");
    let png_bytes = tokio::task::spawn_blocking(move || {
        let chart = compose(&ticker, &table, &style)?;
        render_png(&chart, WIDTH, HEIGHT)
    })
    .await
    .map_err(|e| anyhow!("spawn_blocking join failed: {e}"))??;
    info!(bytes = png_bytes.len(), ticker = %request.ticker, "chart generated");

    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes).into_response())
}
