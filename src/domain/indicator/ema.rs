//! Exponential Moving Average.
//!
//! α = 2/(span+1), seeded with the first observation (no bias adjustment),
//! then EMA[i] = α·C[i] + (1-α)·EMA[i-1]. Defined from the first bar.

use crate::domain::indicator::{simple_points, undefined_points, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], span: usize) -> IndicatorSeries {
    let values = if span == 0 {
        undefined_points(bars)
    } else {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let ema: Vec<Option<f64>> = ema_values(&closes, span).into_iter().map(Some).collect();
        simple_points(bars, &ema)
    };

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    }
}

/// Raw EMA recurrence over any value sequence. `span` must be positive.
pub fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut iter = values.iter();

    if let Some(&first) = iter.next() {
        let mut ema = first;
        out.push(ema);
        for &v in iter {
            ema = alpha * v + (1.0 - alpha) * ema;
            out.push(ema);
        }
    }
    out
}
