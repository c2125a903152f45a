//! RSI (Relative Strength Index).
//!
//! Daily deltas are split into gains (negative deltas zeroed) and losses
//! (magnitude of negative deltas, positive deltas zeroed). Each side is the
//! simple mean over the trailing `n` deltas:
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! When avg_loss == 0 the RSI is 100, including the flat case where avg_gain
//! is also 0. The first delta needs two closes, so the first `n` points are
//! undefined. Variants that zero-fill the missing first delta report a value
//! at index `n - 1`; here that point stays undefined.

use crate::domain::indicator::{rolling_mean, simple_points, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], window: usize) -> IndicatorSeries {
    let mut gains: Vec<Option<f64>> = Vec::with_capacity(bars.len());
    let mut losses: Vec<Option<f64>> = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            gains.push(None);
            losses.push(None);
            continue;
        }
        let change = bar.close - bars[i - 1].close;
        gains.push(Some(if change > 0.0 { change } else { 0.0 }));
        losses.push(Some(if change < 0.0 { -change } else { 0.0 }));
    }

    let avg_gain = rolling_mean(&gains, window);
    let avg_loss = rolling_mean(&losses, window);

    let rsi: Vec<Option<f64>> = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| match (g, l) {
            (Some(g), Some(l)) => Some(rsi_from_averages(*g, *l)),
            _ => None,
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(window),
        values: simple_points(bars, &rsi),
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rsi = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
    rsi.clamp(0.0, 100.0)
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

    #[test]
    fn rsi_empty_bars() {
        let series = calculate_rsi(&[], 14);
        assert!(series.is_empty());
    }

    #[test]
    fn rsi_single_bar() {
        let series = calculate_rsi(&make_bars(&[100.0]), 14);
        assert_eq!(series.len(), 1);
        assert!(!series.values[0].is_defined());
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=16).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        for i in 0..14 {
            assert!(!series.values[i].is_defined(), "bar {} should be undefined", i);
        }
        assert!(series.values[14].is_defined());
        assert!(series.values[15].is_defined());
    }

    #[test]
    fn rsi_point_before_first_full_window_is_undefined() {
        // index 1 has one delta for a window of 2
        let series = calculate_rsi(&make_bars(&[100.0, 102.0, 101.0]), 2);
        assert!(!series.values[1].is_defined());
        let value = series.values[2].simple().unwrap();
        assert!((value - 100.0 * 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        assert_eq!(series.values[14].simple(), Some(100.0));
    }

    #[test]
    fn rsi_flat_prices_resolve_to_100() {
        let series = calculate_rsi(&make_bars(&[50.0; 20]), 14);
        for point in series.values.iter().skip(14) {
            assert_eq!(point.simple(), Some(100.0));
        }
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        assert_eq!(series.values[14].simple(), Some(0.0));
    }

    #[test]
    fn rsi_uses_simple_trailing_means() {
        // deltas: +2, -1, +3, -2 ; window 2
        let bars = make_bars(&[10.0, 12.0, 11.0, 14.0, 12.0]);
        let series = calculate_rsi(&bars, 2);

        // index 2: gains [2, 0] -> 1.0, losses [0, 1] -> 0.5 -> rs 2
        let expected = 100.0 - 100.0 / 3.0;
        assert!((series.values[2].simple().unwrap() - expected).abs() < 1e-12);

        // index 4: gains [3, 0] -> 1.5, losses [0, 2] -> 1.0 -> rs 1.5
        let expected = 100.0 - 100.0 / 2.5;
        assert!((series.values[4].simple().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        for rsi in series.simple_values().into_iter().flatten() {
            assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
        }
    }

    #[test]
    fn rsi_zero_window() {
        let series = calculate_rsi(&make_bars(&[100.0, 101.0]), 0);
        assert_eq!(series.len(), 2);
        assert_eq!(series.defined_count(), 0);
    }

    #[test]
    fn rsi_indicator_type() {
        let series = calculate_rsi(&make_bars(&[100.0]), 14);
        assert_eq!(series.indicator_type, IndicatorType::Rsi(14));
    }
}
