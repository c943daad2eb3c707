//! MACD line and signal from first-close-seeded EMAs.

use ta::Next;
use ta::indicators::ExponentialMovingAverage;

use super::config::MacdConfig;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdColumns {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

/// EMA with `alpha = 2 / (period + 1)`, seeded by the first defined value.
///
/// Undefined inputs produce undefined outputs and leave the state untouched.
pub fn ema(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let Ok(mut ema) = ExponentialMovingAverage::new(period) else {
        return vec![None; values.len()];
    };
    values.iter().map(|v| v.map(|x| ema.next(x))).collect()
}

/// `MACD = EMA_fast - EMA_slow`, `signal = EMA_signal(MACD)`. No histogram.
pub fn macd(closes: &[Option<f64>], config: &MacdConfig) -> MacdColumns {
    let fast = ema(closes, config.fast);
    let slow = ema(closes, config.slow);

    let macd: Vec<Option<f64>> = fast
        .into_iter()
        .zip(slow)
        .map(|(f, s)| Some(f? - s?))
        .collect();
    let signal = ema(&macd, config.signal);

    MacdColumns { macd, signal }
}
