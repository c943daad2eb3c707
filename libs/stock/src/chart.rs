use anyhow::{Error, ensure};
use charming::{
    Chart, ImageFormat, ImageRenderer,
    component::{Axis, Legend, Title},
    element::{AxisLabel, AxisType, LineStyle, SplitLine, Symbol, TextStyle, Tooltip, Trigger},
    series::{Bar, Candlestick, Line},
};

use crate::AugmentedTable;

/// Colours and line width for the composite figure.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub background: String,
    pub text: String,
    pub grid: String,
    pub volume: String,
    pub ma_long: String,
    pub ma_short: String,
    pub bb_mid: String,
    pub bb_band: String,
    pub rsi_long: String,
    pub rsi_short: String,
    pub macd: String,
    pub macd_signal: String,
    pub line_width: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: "#ffffff".into(),
            text: "#333333".into(),
            grid: "#e6e6e6".into(),
            volume: "#9ecae1".into(),
            ma_long: "blue".into(),
            ma_short: "red".into(),
            bb_mid: "black".into(),
            bb_band: "green".into(),
            rsi_long: "purple".into(),
            rsi_short: "orange".into(),
            macd: "black".into(),
            macd_signal: "red".into(),
            line_width: 1.0,
        }
    }
}

/// Left axis: volume and RSI. Right axis: price, bands and MACD.
const LEFT_AXIS: f64 = 0.0;
const RIGHT_AXIS: f64 = 1.0;

/// Undefined points become NaN, which the chart draws as a gap.
fn gaps(column: &[Option<f64>]) -> Vec<f64> {
    column.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

fn line(name: &str, column: &[Option<f64>], color: &str, width: f64, axis: f64) -> Line {
    Line::new()
        .name(name)
        .data(gaps(column))
        .symbol(Symbol::None)
        .y_axis_index(axis)
        .line_style(LineStyle::new().width(width).color(color))
}

/// Builds the candlestick, volume and indicator figure for `table`.
pub fn compose(title: &str, table: &AugmentedTable, style: &ChartStyle) -> Result<Chart, Error> {
    ensure!(!table.is_empty(), "no rows to chart");

    let dates: Vec<String> = table
        .dates()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    let candles: Vec<Vec<f64>> = table
        .bars
        .iter()
        .map(|b| vec![b.open, b.close, b.low, b.high])
        .collect();
    let volume: Vec<f64> = table.bars.iter().map(|b| b.volume).collect();
    let last_close = table.bars.last().map(|b| b.close).unwrap_or_default();
    let width = style.line_width;

    let value_axis = |name: &str| {
        Axis::new()
            .type_(AxisType::Value)
            .name(name)
            .scale(true)
            .axis_label(AxisLabel::new().color(style.text.as_str()))
            .split_line(SplitLine::new().line_style(LineStyle::new().color(style.grid.as_str())))
    };

    let chart = Chart::new()
        .background_color(style.background.as_str())
        .title(
            Title::new()
                .text(format!("{} | {:.2}", title.to_uppercase(), last_close))
                .left("center")
                .top("1%")
                .text_style(TextStyle::new().color(style.text.as_str()).font_size(14)),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new().bottom("0%"))
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(dates)
                .axis_label(AxisLabel::new().rotate(45).color(style.text.as_str())),
        )
        .y_axis(value_axis("Volume / RSI"))
        .y_axis(value_axis("Price / Indicators"))
        .series(
            Candlestick::new()
                .name("K-line")
                .y_axis_index(RIGHT_AXIS)
                .data(candles),
        )
        .series(
            Bar::new()
                .name("Volume")
                .y_axis_index(LEFT_AXIS)
                .item_style(charming::element::ItemStyle::new().color(style.volume.as_str()))
                .data(volume),
        )
        .series(line("MA long", &table.ma_long, &style.ma_long, width, RIGHT_AXIS))
        .series(line("MA short", &table.ma_short, &style.ma_short, width, RIGHT_AXIS))
        .series(line("BB mid", &table.bb_mid, &style.bb_mid, width, RIGHT_AXIS))
        .series(line("BB high", &table.bb_high, &style.bb_band, width, RIGHT_AXIS))
        .series(line("BB low", &table.bb_low, &style.bb_band, width, RIGHT_AXIS))
        .series(line("RSI long", &table.rsi_long, &style.rsi_long, width, LEFT_AXIS))
        .series(line("RSI short", &table.rsi_short, &style.rsi_short, width, LEFT_AXIS))
        .series(line("MACD", &table.macd, &style.macd, width, RIGHT_AXIS))
        .series(line("MACD signal", &table.macd_signal, &style.macd_signal, width, RIGHT_AXIS));

    Ok(chart)
}

/// Rasterizes `chart`. Blocking; call from a blocking task.
pub fn render_png(chart: &Chart, width: u32, height: u32) -> Result<Vec<u8>, Error> {
    let mut renderer = ImageRenderer::new(width, height);
    let png_bytes = renderer.render_format(ImageFormat::Png, chart)?;
    Ok(png_bytes)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{IndicatorConfig, compute};

    fn table(n: usize) -> AugmentedTable {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let bars: Vec<crate::Bar> = (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                crate::Bar {
                    date: start + chrono::Days::new(i as u64),
                    open: c - 0.5,
                    high: c + 1.0,
                    low: c - 1.0,
                    close: c,
                    volume: 1_000.0,
                }
            })
            .collect();
        compute(&bars, &IndicatorConfig::default())
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = compose("2330.TW", &AugmentedTable::default(), &ChartStyle::default()).unwrap_err();
        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn figure_carries_every_series() {
        let chart = compose("2330.tw", &table(30), &ChartStyle::default()).unwrap();
        let json = chart.to_string();
        for name in [
            "K-line",
            "Volume",
            "MA long",
            "MA short",
            "BB mid",
            "BB high",
            "BB low",
            "RSI long",
            "RSI short",
            "MACD",
            "MACD signal",
            "2330.TW",
            "2022-01-03",
        ] {
            assert!(json.contains(name), "missing {name}");
        }
    }

    #[test]
    fn series_sit_on_their_axes() {
        let chart = compose("2330.TW", &table(30), &ChartStyle::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&chart.to_string()).unwrap();

        assert_eq!(json["yAxis"].as_array().map(Vec::len), Some(2));

        let series = json["series"].as_array().unwrap();
        assert_eq!(series.len(), 11);
        for s in series {
            let name = s["name"].as_str().unwrap();
            let expected = match name {
                "Volume" | "RSI long" | "RSI short" => LEFT_AXIS,
                _ => RIGHT_AXIS,
            };
            assert_eq!(s["yAxisIndex"].as_f64(), Some(expected), "{name}");
        }
    }

    #[test]
    fn undefined_points_become_gaps() {
        let out = gaps(&[None, Some(1.0)]);
        assert!(out[0].is_nan());
        assert_eq!(out[1], 1.0);
    }
}
