use thiserror::Error;

/// User-facing failures of a dashboard request.
///
/// Warm-up rows are not errors; they carry `None` in the derived columns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("no price data available for {ticker}")]
    DataUnavailable { ticker: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DashboardError {
    pub fn data_unavailable(ticker: impl Into<String>) -> Self {
        Self::DataUnavailable {
            ticker: ticker.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
