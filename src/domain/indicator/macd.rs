//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! All three EMAs are seeded with their first input, so every point is
//! defined from the first bar.

use crate::domain::indicator::{
    ema_values, undefined_points, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: undefined_points(bars),
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_values(&macd_line, signal_period);

    let values = bars
        .iter()
        .zip(macd_line.iter().zip(&signal_line))
        .map(|(bar, (&line, &signal))| IndicatorPoint {
            date: bar.date,
            value: Some(IndicatorValue::Macd {
                line,
                signal,
                histogram: line - signal,
            }),
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(bars: &[OhlcvBar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar::flat(start + Duration::days(i as i64), close))
            .collect()
    }

    fn rising(n: usize) -> Vec<OhlcvBar> {
        let prices: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        make_bars(&prices)
    }

    fn unpack(point: &IndicatorPoint) -> (f64, f64, f64) {
        match point.value {
            Some(IndicatorValue::Macd {
                line,
                signal,
                histogram,
            }) => (line, signal, histogram),
            ref other => panic!("expected MACD value, got {:?}", other),
        }
    }

    #[test]
    fn macd_full_length_from_first_bar() {
        let series = calculate_macd_default(&rising(40));
        assert_eq!(series.len(), 40);
        assert_eq!(series.defined_count(), 40);

        let (line, signal, histogram) = unpack(&series.values[0]);
        assert_eq!(line, 0.0);
        assert_eq!(signal, 0.0);
        assert_eq!(histogram, 0.0);
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let series = calculate_macd_default(&rising(40));
        for point in &series.values {
            let (line, signal, histogram) = unpack(point);
            assert!((histogram - (line - signal)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let series = calculate_macd(&bars, 3, 5, 2);

        let ema_fast = ema_values(&closes, 3);
        let ema_slow = ema_values(&closes, 5);
        let line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
        let signal = ema_values(&line, 2);

        for (i, point) in series.values.iter().enumerate() {
            let (l, s, _) = unpack(point);
            assert!((l - line[i]).abs() < f64::EPSILON, "line mismatch at {}", i);
            assert!((s - signal[i]).abs() < f64::EPSILON, "signal mismatch at {}", i);
        }
    }

    #[test]
    fn macd_rising_prices_turn_positive() {
        let series = calculate_macd_default(&rising(40));
        let (line, _, histogram) = unpack(series.latest().unwrap());
        assert!(line > 0.0);
        assert!(histogram > 0.0);
    }

    #[test]
    fn macd_indicator_type() {
        let series = calculate_macd(&rising(3), 5, 10, 3);
        assert_eq!(
            series.indicator_type,
            IndicatorType::Macd {
                fast: 5,
                slow: 10,
                signal: 3
            }
        );
    }

    #[test]
    fn macd_empty_bars() {
        assert!(calculate_macd_default(&[]).is_empty());
    }

    #[test]
    fn macd_zero_period() {
        let bars = rising(3);
        for (f, s, g) in [(0, 26, 9), (12, 0, 9), (12, 26, 0)] {
            let series = calculate_macd(&bars, f, s, g);
            assert_eq!(series.len(), 3);
            assert_eq!(series.defined_count(), 0);
        }
    }
}
