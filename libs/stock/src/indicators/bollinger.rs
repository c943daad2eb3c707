//! Bollinger Bands: a rolling mean with bands `k` standard deviations away.

use super::config::{BollingerConfig, Deviation};
use super::window::{mean, rolling};

/// The three band columns, each as long as the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerColumns {
    pub mid: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
}

pub fn bollinger(closes: &[Option<f64>], config: &BollingerConfig) -> BollingerColumns {
    let mid = rolling(closes, config.period, mean);
    let sigma = rolling(closes, config.period, |w| std_dev(w, config.deviation));

    let offsets: Vec<Option<f64>> = sigma
        .iter()
        .map(|s| s.map(|s| config.multiplier * s))
        .collect();

    let high = mid
        .iter()
        .zip(&offsets)
        .map(|(m, o)| Some((*m)? + (*o)?))
        .collect();
    let low = mid
        .iter()
        .zip(&offsets)
        .map(|(m, o)| Some((*m)? - (*o)?))
        .collect();

    BollingerColumns { mid, high, low }
}

/// Two-pass standard deviation. Sample deviation of a single point is undefined.
fn std_dev(window: &[f64], deviation: Deviation) -> Option<f64> {
    let n = window.len();
    let divisor = match deviation {
        Deviation::Sample if n < 2 => return None,
        Deviation::Sample => (n - 1) as f64,
        Deviation::Population if n == 0 => return None,
        Deviation::Population => n as f64,
    };

    let mu = mean(window)?;
    let variance = window.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / divisor;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::window::defined;

    fn assert_close(lhs: Option<f64>, rhs: f64) {
        let lhs = lhs.expect("value should be defined");
        assert!((lhs - rhs).abs() <= 1e-8, "{lhs} != {rhs}");
    }

    fn config(period: usize, multiplier: f64, deviation: Deviation) -> BollingerConfig {
        BollingerConfig {
            period,
            multiplier,
            deviation,
        }
    }

    #[test]
    fn sample_deviation_bands() {
        let closes = defined([10.0, 11.0, 12.0, 13.0, 14.0]);
        let bands = bollinger(&closes, &config(5, 2.0, Deviation::Sample));
        // sample variance = 10 / 4
        let sigma = 2.5f64.sqrt();
        assert_close(bands.mid[4], 12.0);
        assert_close(bands.high[4], 12.0 + 2.0 * sigma);
        assert_close(bands.low[4], 12.0 - 2.0 * sigma);
    }

    #[test]
    fn population_deviation_bands() {
        let closes = defined([10.0, 11.0, 12.0, 13.0, 14.0]);
        let bands = bollinger(&closes, &config(5, 2.0, Deviation::Population));
        assert_close(bands.mid[4], 12.0);
        assert_close(bands.high[4], 14.82842712);
        assert_close(bands.low[4], 9.17157288);
    }

    #[test]
    fn warm_up_rows_are_undefined() {
        let closes = defined([1.0, 2.0, 3.0]);
        let bands = bollinger(&closes, &config(3, 2.0, Deviation::Sample));
        for column in [&bands.mid, &bands.high, &bands.low] {
            assert_eq!(&column[..2], &[None, None]);
            assert!(column[2].is_some());
        }
    }

    #[test]
    fn single_point_sample_window_has_no_bands() {
        let closes = defined([1.0, 2.0]);
        let bands = bollinger(&closes, &config(1, 2.0, Deviation::Sample));
        assert_eq!(bands.mid, closes);
        assert_eq!(bands.high, vec![None, None]);
        assert_eq!(bands.low, vec![None, None]);
    }

    #[test]
    fn flat_series_collapses_the_bands() {
        let closes = defined([7.0; 4]);
        let bands = bollinger(&closes, &config(4, 2.0, Deviation::Sample));
        assert_eq!(bands.high[3], Some(7.0));
        assert_eq!(bands.low[3], Some(7.0));
    }
}
