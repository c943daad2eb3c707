//! The indicator engine: a pure transform from OHLCV rows to derived columns.

pub mod bollinger;
pub mod config;
pub mod engine;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod window;

pub use config::{
    BollingerConfig, Deviation, IndicatorConfig, MAX_PERIOD, MacdConfig, RsiSmoothing,
};
pub use engine::{AugmentedRow, AugmentedTable, RSI_MID, compute};
