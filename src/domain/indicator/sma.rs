//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). The first (n-1) points are undefined;
//! a series shorter than n is undefined throughout.

use crate::domain::indicator::{closes, rolling_mean, simple_points, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], window: usize) -> IndicatorSeries {
    let values = rolling_mean(&closes(bars), window);

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(window),
        values: simple_points(bars, &values),
    }
}
