use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use stock::DashboardError;
use tracing::error;

/// Error half of the JSON and PNG routes.
#[derive(Debug)]
pub enum ApiError {
    Dashboard(DashboardError),
    Internal(anyhow::Error),
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        Self::Dashboard(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Dashboard(e @ DashboardError::InvalidConfig(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Dashboard(e @ DashboardError::DataUnavailable { .. }) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::Internal(e) => {
                error!(error = ?e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
