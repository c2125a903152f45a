//! Rolling annualized volatility.
//!
//! VOL(n)[i] = sample_std(r[i-n+1..=i]) × √annualization, where r is the daily
//! simple return. The first return needs two closes, so the first `n` points
//! are undefined.

use crate::domain::indicator::{rolling_std, simple_points, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::returns::daily_returns;

pub fn calculate_rolling_volatility(
    bars: &[OhlcvBar],
    window: usize,
    annualization_factor: f64,
) -> IndicatorSeries {
    let returns: Vec<Option<f64>> = daily_returns(bars).iter().map(|r| r.value).collect();
    let scale = annualization_factor.sqrt();

    let values: Vec<Option<f64>> = rolling_std(&returns, window)
        .into_iter()
        .map(|s| s.map(|s| s * scale))
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::RollingVolatility(window),
        values: simple_points(bars, &values),
    }
}
