//! Bollinger Bands.
//!
//! - Middle: SMA over n closes
//! - Upper: Middle + k × σ
//! - Lower: Middle - k × σ
//!
//! σ is the trailing sample standard deviation (divides by n-1) over the same
//! window. Undefined wherever the SMA is undefined, and for n = 1 where σ has
//! no sample estimate.

use crate::domain::indicator::{
    closes, rolling_mean, rolling_std, IndicatorPoint, IndicatorSeries, IndicatorType,
    IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_bollinger(bars: &[OhlcvBar], period: usize, k: f64) -> IndicatorSeries {
    let closes = closes(bars);
    let middle = rolling_mean(&closes, period);
    let sigma = rolling_std(&closes, period);

    let values = bars
        .iter()
        .zip(middle.iter().zip(&sigma))
        .map(|(bar, (m, s))| IndicatorPoint {
            date: bar.date,
            value: match (m, s) {
                (Some(middle), Some(sigma)) => Some(IndicatorValue::Bollinger {
                    upper: middle + k * sigma,
                    middle: *middle,
                    lower: middle - k * sigma,
                }),
                _ => None,
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100: (k * 100.0).round().max(0.0) as u32,
        },
        values,
    }
}
