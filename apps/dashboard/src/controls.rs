use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stock::{BarRequest, DashboardError, IndicatorConfig, indicators::RsiSmoothing};

/// K-line duration the sidebar starts with. Bars are always daily.
pub const DAILY_MINUTES: u32 = 1440;

/// Sidebar inputs, read from the page's query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub kbar_minutes: u32,
    pub ma_long: usize,
    pub ma_short: usize,
    pub rsi_long: usize,
    pub rsi_short: usize,
    pub rsi_smoothing: RsiSmoothing,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            ticker: "2330.TW".to_string(),
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2022, 11, 18).unwrap_or_default(),
            kbar_minutes: DAILY_MINUTES,
            ma_long: 10,
            ma_short: 2,
            rsi_long: 14,
            rsi_short: 7,
            rsi_smoothing: RsiSmoothing::RollingMean,
        }
    }
}

impl Controls {
    pub fn bar_request(&self) -> Result<BarRequest, DashboardError> {
        let request = BarRequest::new(&self.ticker, self.start, self.end);
        request.validate()?;
        Ok(request)
    }

    /// Indicator periods and RSI smoothing from the sidebar; Bollinger and MACD stay fixed.
    pub fn indicator_config(&self) -> Result<IndicatorConfig, DashboardError> {
        let config = IndicatorConfig {
            ma_long: self.ma_long,
            ma_short: self.ma_short,
            rsi_long: self.rsi_long,
            rsi_short: self.rsi_short,
            rsi_smoothing: self.rsi_smoothing,
            ..IndicatorConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// The same inputs as a query string, for links to the export routes.
    pub fn query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }
}
