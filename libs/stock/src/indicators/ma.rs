//! Simple moving average.

use super::window::{mean, rolling};

/// Trailing arithmetic mean of `period` points; no forward fill.
pub fn sma(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, mean)
}
