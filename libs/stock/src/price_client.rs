use std::{future::Future, str::FromStr, time::Duration};

use anyhow::{Context, Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use chrono_tz::Tz;
use reqwest::{
    Client, StatusCode,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{Bar, BarRequest};

pub const DEFAULT_BASE_API: &str = "https://query1.finance.yahoo.com";

/// Anything that can produce daily bars for a request.
pub trait BarSource: Send + Sync {
    fn fetch_bars(&self, request: &BarRequest) -> impl Future<Output = Result<Vec<Bar>>> + Send;
}

/// Daily bars from the Yahoo Finance chart API.
#[derive(Clone)]
pub struct PriceClient {
    client: Client,
    base_api: String,
}

impl PriceClient {
    pub fn new(base_api: String, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (X11; Linux x86_64) stock-dashboard"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_api })
    }

    #[instrument(name = "fetch_price", skip(self), fields(ticker = %request.ticker))]
    pub async fn fetch_price(&self, request: &BarRequest) -> Result<Vec<Bar>, Error> {
        if request.is_empty_range() {
            debug!("empty request, skipping network");
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_api.trim_end_matches('/'),
            request.ticker
        );

        let period1 = midnight_utc(request.start).to_string();
        let period2 = midnight_utc(request.end).to_string();

        let res = self
            .client
            .get(url)
            .query(&[
                ("interval", "1d"),
                ("events", "history"),
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
            ])
            .send()
            .await?;

        if res.status() == StatusCode::NOT_FOUND {
            warn!("unknown ticker");
            return Ok(Vec::new());
        }

        let body: ChartResponse = res
            .error_for_status()?
            .json()
            .await
            .context("failed to decode chart response")?;

        let bars = parse_chart(body, request)?;
        debug!(bars = bars.len(), "parsed chart response");
        Ok(bars)
    }
}

impl BarSource for PriceClient {
    fn fetch_bars(&self, request: &BarRequest) -> impl Future<Output = Result<Vec<Bar>>> + Send {
        self.fetch_price(request)
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Turns a chart payload into ascending, de-duplicated bars inside `[start, end)`.
pub fn parse_chart(body: ChartResponse, request: &BarRequest) -> Result<Vec<Bar>> {
    if let Some(err) = body.chart.error {
        if err.code == "Not Found" {
            warn!(ticker = %request.ticker, description = %err.description, "unknown ticker");
            return Ok(Vec::new());
        }
        anyhow::bail!("Yahoo API error: {} - {}", err.code, err.description);
    }

    let Some(result) = body.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let zone = ExchangeZone::from_meta(&result.meta);

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let field = |column: &Vec<Option<f64>>| column.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
            field(&quote.volume),
        ) else {
            continue;
        };
        let Some(date) = zone.trading_date(ts) else {
            continue;
        };
        if date < request.start || date >= request.end {
            continue;
        }

        bars.push(Bar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    // Yahoo occasionally repeats the live session as an extra row.
    bars.reverse();
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);

    Ok(bars)
}

enum ExchangeZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ExchangeZone {
    fn from_meta(meta: &ChartMeta) -> Self {
        if let Some(tz) = meta
            .exchange_timezone_name
            .as_deref()
            .and_then(|name| Tz::from_str(name).ok())
        {
            return Self::Named(tz);
        }
        let offset = meta
            .gmtoffset
            .and_then(|secs| i32::try_from(secs).ok())
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self::Fixed(offset)
    }

    fn trading_date(&self, ts: i64) -> Option<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp(ts, 0)?;
        Some(match self {
            Self::Named(tz) => utc.with_timezone(tz).date_naive(),
            Self::Fixed(offset) => utc.with_timezone(offset).date_naive(),
        })
    }
}

//
// Match Yahoo chart API JSON
// https://query1.finance.yahoo.com/v8/finance/chart/{symbol}
//
#[derive(Debug, Deserialize, Clone)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    pub timestamp: Option<Vec<i64>>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub exchange_timezone_name: Option<String>,
    pub gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}
