//! Relative strength index.
//!
//! Both smoothings define RSI from index `period` onwards: the first
//! difference is undefined, so `period` moves need `period + 1` closes.

use super::config::RsiSmoothing;
use super::window::{diff, mean, rolling};

/// RSI column over `closes`. A zero period yields an all-undefined column.
pub fn rsi(closes: &[Option<f64>], period: usize, smoothing: RsiSmoothing) -> Vec<Option<f64>> {
    let deltas = diff(closes);
    let gains: Vec<Option<f64>> = deltas.iter().map(|d| d.map(|d| d.max(0.0))).collect();
    let losses: Vec<Option<f64>> = deltas.iter().map(|d| d.map(|d| (-d).max(0.0))).collect();

    let (avg_gain, avg_loss) = match smoothing {
        RsiSmoothing::RollingMean => (
            rolling(&gains, period, mean),
            rolling(&losses, period, mean),
        ),
        RsiSmoothing::Wilder => (wilder(&gains, period), wilder(&losses, period)),
    };

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(g, l)| Some(from_averages(g?, l?)))
        .collect()
}

/// `100 - 100 / (1 + g/l)`, pinned to 100 when there are no losses.
fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Wilder smoothing: seed with the mean of the first `period` defined points,
/// then `avg = (avg * (period - 1) + x) / period`. An undefined point restarts
/// the warm-up.
fn wilder(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let p = period as f64;
    let mut avg: Option<f64> = None;
    let mut warmup_sum = 0.0;
    let mut warmup_count = 0usize;

    for (slot, value) in out.iter_mut().zip(values) {
        let Some(x) = *value else {
            avg = None;
            warmup_sum = 0.0;
            warmup_count = 0;
            continue;
        };

        avg = match avg {
            Some(prev) => Some((prev * (p - 1.0) + x) / p),
            None => {
                warmup_sum += x;
                warmup_count += 1;
                (warmup_count == period).then(|| warmup_sum / p)
            }
        };
        *slot = avg;
    }
    out
}
