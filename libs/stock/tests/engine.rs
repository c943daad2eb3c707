use chrono::{Days, NaiveDate};
use stock::indicators::{BollingerConfig, Deviation, RsiSmoothing};
use stock::{AugmentedTable, Bar, IndicatorConfig, compute};

fn bars(closes: &[f64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar {
            date: start + Days::new(i as u64),
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close: c,
            volume: 500.0 + i as f64,
        })
        .collect()
}

fn config(ma: usize, rsi: usize) -> IndicatorConfig {
    IndicatorConfig {
        ma_long: ma,
        ma_short: ma,
        rsi_long: rsi,
        rsi_short: rsi,
        ..Default::default()
    }
}

fn assert_close(lhs: f64, rhs: f64, tolerance: f64) {
    assert!((lhs - rhs).abs() <= tolerance, "{lhs} != {rhs}");
}

/// A wandering series with both gains and losses.
fn sample_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            100.0 + 5.0 * (x / 3.0).sin() + 0.1 * x
        })
        .collect()
}

#[test]
fn constant_series() {
    let table = compute(&bars(&[10.0; 5]), &config(3, 3));
    assert_eq!(table.ma_long, vec![None, None, Some(10.0), Some(10.0), Some(10.0)]);
    assert_eq!(&table.rsi_long[..3], &[None, None, None]);
    assert_eq!(table.rsi_long[3], Some(100.0));
    assert_eq!(table.rsi_long[4], Some(100.0));
}

#[test]
fn rising_series_has_rsi_100() {
    let table = compute(&bars(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), &config(2, 2));
    assert_eq!(&table.rsi_short[..2], &[None, None]);
    assert!(table.rsi_short[2..].iter().all(|v| *v == Some(100.0)));
}

#[test]
fn moving_average_sanity() {
    let table = compute(&bars(&[2.0, 4.0, 6.0, 8.0, 10.0]), &config(2, 2));
    assert_eq!(
        table.ma_short,
        vec![None, Some(3.0), Some(5.0), Some(7.0), Some(9.0)]
    );
}

#[test]
fn bollinger_width() {
    // Ten points on each side of 50 with sample deviation exactly 1.
    let a = (19.0f64 / 20.0).sqrt();
    let closes: Vec<f64> = (0..20)
        .map(|i| if i % 2 == 0 { 50.0 + a } else { 50.0 - a })
        .collect();
    let table = compute(&bars(&closes), &IndicatorConfig::default());

    assert!(table.bb_mid[..19].iter().all(Option::is_none));
    assert_close(table.bb_mid[19].unwrap(), 50.0, 1e-9);
    assert_close(table.bb_high[19].unwrap(), 52.0, 1e-9);
    assert_close(table.bb_low[19].unwrap(), 48.0, 1e-9);
}

#[test]
fn population_deviation_is_narrower() {
    let closes = sample_closes(40);
    let sample = compute(&bars(&closes), &IndicatorConfig::default());
    let population = compute(
        &bars(&closes),
        &IndicatorConfig {
            bollinger: BollingerConfig {
                deviation: Deviation::Population,
                ..Default::default()
            },
            ..Default::default()
        },
    );
    let width = |t: &AugmentedTable| t.bb_high[39].unwrap() - t.bb_low[39].unwrap();
    assert!(width(&population) < width(&sample));
    assert_eq!(population.bb_mid, sample.bb_mid);
}

#[test]
fn constant_series_has_flat_macd() {
    let table = compute(&bars(&[100.0; 40]), &IndicatorConfig::default());
    for (macd, signal) in table.macd.iter().zip(&table.macd_signal) {
        assert_close(macd.unwrap(), 0.0, 1e-9);
        assert_close(signal.unwrap(), 0.0, 1e-9);
    }
}

#[test]
fn empty_table() {
    let table = compute(&[], &IndicatorConfig::default());
    assert!(table.is_empty());
    assert_eq!(table, AugmentedTable::default());
    assert_eq!(table.rows().count(), 0);
}

#[test]
fn row_count_and_order_are_preserved() {
    let input = bars(&sample_closes(60));
    let table = compute(&input, &IndicatorConfig::default());
    assert_eq!(table.len(), input.len());
    assert_eq!(table.bars, input);
    assert_eq!(table.rows().count(), input.len());
}

#[test]
fn moving_average_is_the_trailing_mean() {
    let closes = sample_closes(50);
    let p = 7;
    let table = compute(&bars(&closes), &config(p, 14));
    for (i, value) in table.ma_long.iter().enumerate() {
        if i < p - 1 {
            assert!(value.is_none());
        } else {
            let expected = closes[i + 1 - p..=i].iter().sum::<f64>() / p as f64;
            assert_close(value.unwrap(), expected, 1e-9);
        }
    }
}

#[test]
fn bands_are_ordered_and_symmetric() {
    let table = compute(&bars(&sample_closes(80)), &IndicatorConfig::default());
    for i in 0..table.len() {
        let (Some(hi), Some(mid), Some(lo)) = (table.bb_high[i], table.bb_mid[i], table.bb_low[i])
        else {
            continue;
        };
        assert!(hi >= mid && mid >= lo);
        assert_close(hi - mid, mid - lo, 1e-9);
    }
}

#[test]
fn rsi_stays_in_range() {
    for smoothing in [RsiSmoothing::RollingMean, RsiSmoothing::Wilder] {
        let cfg = IndicatorConfig {
            rsi_smoothing: smoothing,
            ..Default::default()
        };
        let table = compute(&bars(&sample_closes(120)), &cfg);
        let defined: Vec<f64> = table.rsi_long.iter().chain(&table.rsi_short).flatten().copied().collect();
        assert!(!defined.is_empty());
        assert!(defined.iter().all(|v| (0.0..=100.0).contains(v)));
    }
}

#[test]
fn rsi_mid_is_a_reference_line() {
    let table = compute(&bars(&sample_closes(10)), &IndicatorConfig::default());
    assert!(table.rsi_mid.iter().all(|v| *v == Some(50.0)));
}

#[test]
fn macd_starts_at_the_first_row() {
    let table = compute(&bars(&sample_closes(30)), &IndicatorConfig::default());
    assert!(table.macd.iter().all(Option::is_some));
    assert_eq!(table.macd_signal[0], table.macd[0]);
}

#[test]
fn zero_and_oversized_periods_are_undefined() {
    let table = compute(&bars(&sample_closes(10)), &config(0, 0));
    assert!(table.ma_long.iter().all(Option::is_none));
    assert!(table.rsi_long.iter().all(Option::is_none));

    let table = compute(&bars(&sample_closes(10)), &config(11, 10));
    assert!(table.ma_long.iter().all(Option::is_none));
    assert!(table.rsi_long.iter().all(Option::is_none));
}

#[test]
fn recomputing_from_the_ohlcv_columns_is_idempotent() {
    let cfg = IndicatorConfig::default();
    let first = compute(&bars(&sample_closes(70)), &cfg);
    let second = compute(&first.bars, &cfg);
    assert_eq!(first, second);
}

#[test]
fn repeated_calls_are_bitwise_equal() {
    let input = bars(&sample_closes(90));
    let cfg = IndicatorConfig::default();
    let a = compute(&input, &cfg);
    let b = compute(&input, &cfg);
    let bits = |t: &AugmentedTable| -> Vec<Option<u64>> {
        [&t.ma_long, &t.rsi_long, &t.bb_high, &t.macd, &t.macd_signal]
            .into_iter()
            .flatten()
            .map(|v| v.map(f64::to_bits))
            .collect()
    };
    assert_eq!(bits(&a), bits(&b));
}

#[test]
fn non_finite_close_blanks_its_row() {
    let mut closes = sample_closes(40);
    closes[30] = f64::INFINITY;
    let table = compute(&bars(&closes), &IndicatorConfig::default());

    assert_eq!(table.len(), 40);
    assert!(table.ma_long[30].is_none());
    assert!(table.rsi_long[30].is_none());
    assert!(table.bb_mid[30].is_none());
    assert!(table.macd[30].is_none());
    assert!(table.macd_signal[30].is_none());
    assert!(table.macd[31].is_some());
    assert!(table.ma_long[29].is_some());
}
