//! Trend labels from the deviation of the close against its moving average.
//!
//! pct_dev = (close - SMA) / SMA × 100. Above +threshold is an uptrend, below
//! -threshold a downtrend, anything in between stable. Dates without a
//! defined SMA (warmup, or a zero average) are labelled `Stable`.

use crate::domain::config::AnalyticsConfig;
use crate::domain::indicator::calculate_sma;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrendLabel {
    Uptrend,
    Downtrend,
    Stable,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendLabel::Uptrend => "Uptrend",
            TrendLabel::Downtrend => "Downtrend",
            TrendLabel::Stable => "Stable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub sma: Option<f64>,
    pub pct_deviation: Option<f64>,
    pub label: TrendLabel,
}

pub fn classify_trend(bars: &[OhlcvBar], config: &AnalyticsConfig) -> Vec<TrendPoint> {
    let sma = calculate_sma(bars, config.trend_sma_window);

    bars.iter()
        .zip(sma.simple_values())
        .map(|(bar, sma)| {
            let pct_deviation = sma
                .filter(|avg| *avg != 0.0)
                .map(|avg| (bar.close - avg) / avg * 100.0);
            TrendPoint {
                date: bar.date,
                close: bar.close,
                sma,
                pct_deviation,
                label: label_for(pct_deviation, config.trend_threshold_pct),
            }
        })
        .collect()
}

pub fn label_for(pct_deviation: Option<f64>, threshold_pct: f64) -> TrendLabel {
    match pct_deviation {
        Some(dev) if dev > threshold_pct => TrendLabel::Uptrend,
        Some(dev) if dev < -threshold_pct => TrendLabel::Downtrend,
        _ => TrendLabel::Stable,
    }
}
