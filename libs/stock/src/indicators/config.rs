use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// Upper bound for the user-adjustable periods.
pub const MAX_PERIOD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSmoothing {
    /// Arithmetic mean of the last `p` gains and losses.
    #[default]
    RollingMean,
    /// Wilder's recursive smoothing, seeded by the mean of the first `p` moves.
    Wilder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deviation {
    /// Divisor `w - 1`.
    #[default]
    Sample,
    /// Divisor `w`.
    Population,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerConfig {
    pub period: usize,
    pub multiplier: f64,
    pub deviation: Deviation,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            multiplier: 2.0,
            deviation: Deviation::Sample,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdConfig {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Periods and parameters for every derived column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorConfig {
    pub ma_long: usize,
    pub ma_short: usize,
    pub rsi_long: usize,
    pub rsi_short: usize,
    pub rsi_smoothing: RsiSmoothing,
    pub bollinger: BollingerConfig,
    pub macd: MacdConfig,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_long: 10,
            ma_short: 2,
            rsi_long: 14,
            rsi_short: 7,
            rsi_smoothing: RsiSmoothing::RollingMean,
            bollinger: BollingerConfig::default(),
            macd: MacdConfig::default(),
        }
    }
}

impl IndicatorConfig {
    /// Checks the ranges the control surface allows.
    ///
    /// A zero user period is accepted; its column is simply undefined.
    pub fn validate(&self) -> Result<(), DashboardError> {
        for (name, period) in [
            ("ma_long", self.ma_long),
            ("ma_short", self.ma_short),
            ("rsi_long", self.rsi_long),
            ("rsi_short", self.rsi_short),
        ] {
            if period > MAX_PERIOD {
                return Err(DashboardError::invalid_config(format!(
                    "{name} period {period} is outside [0, {MAX_PERIOD}]"
                )));
            }
        }

        if self.bollinger.period == 0 {
            return Err(DashboardError::invalid_config(
                "bollinger period must be positive",
            ));
        }
        if !self.bollinger.multiplier.is_finite() || self.bollinger.multiplier < 0.0 {
            return Err(DashboardError::invalid_config(format!(
                "bollinger multiplier {} must be a non-negative number",
                self.bollinger.multiplier
            )));
        }

        let MacdConfig { fast, slow, signal } = self.macd;
        if fast == 0 || slow == 0 || signal == 0 {
            return Err(DashboardError::invalid_config(format!(
                "macd periods ({fast}, {slow}, {signal}) must be positive"
            )));
        }

        Ok(())
    }
}
