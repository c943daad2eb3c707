use chrono::NaiveDate;
use serde::Serialize;

use super::bollinger::bollinger;
use super::config::IndicatorConfig;
use super::ma::sma;
use super::macd::macd;
use super::rsi::rsi;
use super::window::defined;
use crate::Bar;

/// Level of the RSI reference line.
pub const RSI_MID: f64 = 50.0;

/// OHLCV rows plus one column per derived series, all the same length.
///
/// `None` marks rows where an indicator is not defined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AugmentedTable {
    pub bars: Vec<Bar>,
    pub ma_long: Vec<Option<f64>>,
    pub ma_short: Vec<Option<f64>>,
    pub rsi_long: Vec<Option<f64>>,
    pub rsi_short: Vec<Option<f64>>,
    pub rsi_mid: Vec<Option<f64>>,
    pub bb_mid: Vec<Option<f64>>,
    pub bb_high: Vec<Option<f64>>,
    pub bb_low: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
}

/// One row of an [`AugmentedTable`], as served by the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AugmentedRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub ma_long: Option<f64>,
    pub ma_short: Option<f64>,
    pub rsi_long: Option<f64>,
    pub rsi_short: Option<f64>,
    pub rsi_mid: Option<f64>,
    pub bb_mid: Option<f64>,
    pub bb_high: Option<f64>,
    pub bb_low: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
}

/// Out-of-range reads as undefined; the columns are public and may be short.
fn cell(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

impl AugmentedTable {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn row(&self, i: usize) -> Option<AugmentedRow> {
        let bar = self.bars.get(i)?;
        Some(AugmentedRow {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            ma_long: cell(&self.ma_long, i),
            ma_short: cell(&self.ma_short, i),
            rsi_long: cell(&self.rsi_long, i),
            rsi_short: cell(&self.rsi_short, i),
            rsi_mid: cell(&self.rsi_mid, i),
            bb_mid: cell(&self.bb_mid, i),
            bb_high: cell(&self.bb_high, i),
            bb_low: cell(&self.bb_low, i),
            macd: cell(&self.macd, i),
            macd_signal: cell(&self.macd_signal, i),
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = AugmentedRow> + '_ {
        (0..self.len()).filter_map(|i| self.row(i))
    }
}

/// Derives every indicator column from `bars`.
///
/// Pure and infallible: rows keep their count and order, unusable periods
/// produce undefined columns, and a non-finite close is an undefined point.
pub fn compute(bars: &[Bar], config: &IndicatorConfig) -> AugmentedTable {
    let closes = defined(bars.iter().map(|b| b.close));

    let bands = bollinger(&closes, &config.bollinger);
    let lines = macd(&closes, &config.macd);

    AugmentedTable {
        bars: bars.to_vec(),
        ma_long: sma(&closes, config.ma_long),
        ma_short: sma(&closes, config.ma_short),
        rsi_long: rsi(&closes, config.rsi_long, config.rsi_smoothing),
        rsi_short: rsi(&closes, config.rsi_short, config.rsi_smoothing),
        rsi_mid: vec![Some(RSI_MID); bars.len()],
        bb_mid: bands.mid,
        bb_high: bands.high,
        bb_low: bands.low,
        macd: lines.macd,
        macd_signal: lines.signal,
    }
}
