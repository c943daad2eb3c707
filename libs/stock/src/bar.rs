use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// One daily OHLCV row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// What the dashboard asks the loader for.
///
/// `end` is exclusive: rows strictly before `end` are returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BarRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BarRequest {
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: Self::normalize(ticker),
            start,
            end,
        }
    }

    fn normalize(ticker: &str) -> String {
        ticker.trim().to_uppercase()
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.start > self.end {
            return Err(DashboardError::invalid_config(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Memoization key, stable across processes.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.ticker,
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    pub fn is_empty_range(&self) -> bool {
        self.ticker.is_empty() || self.start >= self.end
    }
}
