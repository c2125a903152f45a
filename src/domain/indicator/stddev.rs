//! Rolling standard deviation of closing prices.
//!
//! Sample estimate over the trailing n closes (divides by n-1).
//! Warmup: first (n-1) bars are undefined; n = 1 is undefined throughout.

use crate::domain::indicator::{closes, rolling_std, simple_points, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_stddev(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = rolling_std(&closes(bars), period);

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values: simple_points(bars, &values),
    }
}
