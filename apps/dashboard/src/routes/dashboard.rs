use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use stock::{
    BarSource, DashboardError,
    chart::compose,
    indicators::{MAX_PERIOD, RsiSmoothing},
};
use tracing::{error, warn};

use super::build_table;
use crate::{AppState, controls::Controls};

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub controls: Controls,
    pub max_period: usize,
    pub wilder: bool,
    pub version: String,
    pub query: String,
    pub message: Option<String>,
    pub chart_option: Option<String>,
}

fn friendly(e: &DashboardError) -> String {
    match e {
        DashboardError::DataUnavailable { ticker } => format!(
            "No price data for {ticker} in this date range. Check the ticker symbol or widen the dates."
        ),
        DashboardError::InvalidConfig(reason) => format!("Please adjust the inputs: {reason}."),
    }
}

/// The chart option goes inside a `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

pub async fn page<S: BarSource>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<Controls>, QueryRejection>,
) -> Response {
    let (controls, outcome) = match query {
        Ok(Query(controls)) => {
            let outcome = build_table(&state, &controls).await;
            (controls, outcome)
        }
        Err(rejection) => (
            Controls::default(),
            Err(DashboardError::invalid_config(rejection.body_text())),
        ),
    };

    let mut page = DashboardPage {
        query: controls.query_string(),
        wilder: controls.rsi_smoothing == RsiSmoothing::Wilder,
        controls,
        max_period: MAX_PERIOD,
        version: state.version.clone(),
        message: None,
        chart_option: None,
    };

    match outcome {
        Ok((request, table)) => match compose(&request.ticker, &table, &state.style) {
            Ok(chart) => page.chart_option = Some(script_safe(&chart.to_string())),
            Err(e) => {
                warn!(error = ?e, "compose failed");
                page.message = Some(friendly(&DashboardError::data_unavailable(request.ticker)));
            }
        },
        Err(e) => page.message = Some(friendly(&e)),
    }

    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = ?e, "template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
        }
    }
}
