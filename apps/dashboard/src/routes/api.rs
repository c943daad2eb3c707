use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Value, json};
use stock::{AugmentedRow, BarSource, DashboardError};

use super::{ApiError, build_table};
use crate::{AppState, controls::Controls};

#[derive(Debug, Serialize)]
pub struct IndicatorResponse {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub rows: Vec<AugmentedRow>,
}

pub async fn indicators<S: BarSource>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<Controls>, QueryRejection>,
) -> Result<Json<IndicatorResponse>, ApiError> {
    let Query(controls) = query.map_err(|r| DashboardError::invalid_config(r.body_text()))?;
    let (request, table) = build_table(&state, &controls).await?;
    Ok(Json(IndicatorResponse {
        ticker: request.ticker,
        start: request.start,
        end: request.end,
        rows: table.rows().collect(),
    }))
}

pub async fn health<S: BarSource>(State(state): State<Arc<AppState<S>>>) -> Json<Value> {
    Json(json!({ "status": "ok", "version": state.version }))
}
