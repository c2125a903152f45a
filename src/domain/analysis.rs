//! Full per-symbol analysis composed from the indicator, risk, trend and
//! forecast components.
//!
//! Components only share the input series, so a failure in one (a forecast
//! on short history, say) is recorded in its own field and the rest are
//! still reported.

use crate::domain::config::AnalyticsConfig;
use crate::domain::error::{serialize_outcome, MetricError};
use crate::domain::forecast::{forecast, Forecast};
use crate::domain::indicator::{
    calculate_bollinger, calculate_ema, calculate_macd, calculate_rolling_volatility,
    calculate_rsi, calculate_sma, calculate_stddev, IndicatorSeries, IndicatorType,
};
use crate::domain::metrics::{max_drawdown, DrawdownReport, RiskSummary};
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::domain::returns::{
    calendar_year_summary, relative_performance, PerformancePoint, YearSummary,
};
use crate::domain::trend::{classify_trend, TrendPoint};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub observations: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub last_close: Option<f64>,
    pub indicators: Vec<IndicatorSeries>,
    pub risk: RiskSummary,
    #[serde(serialize_with = "serialize_outcome")]
    pub drawdown: Result<DrawdownReport, MetricError>,
    pub trend: Vec<TrendPoint>,
    #[serde(serialize_with = "serialize_outcome")]
    pub forecast: Result<Forecast, MetricError>,
    pub yearly: Vec<YearSummary>,
    #[serde(serialize_with = "serialize_outcome")]
    pub performance: Result<Vec<PerformancePoint>, MetricError>,
}

impl SymbolAnalysis {
    pub fn indicator(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.indicators
            .iter()
            .find(|s| &s.indicator_type == indicator_type)
    }

    pub fn latest_trend(&self) -> Option<&TrendPoint> {
        self.trend.last()
    }
}

/// The configured indicator set, in display order.
pub fn compute_indicators(bars: &[OhlcvBar], config: &AnalyticsConfig) -> Vec<IndicatorSeries> {
    vec![
        calculate_sma(bars, config.window_sma),
        calculate_ema(bars, config.window_sma),
        calculate_rsi(bars, config.window_rsi),
        calculate_macd(bars, config.macd_fast, config.macd_slow, config.macd_signal),
        calculate_bollinger(bars, config.bollinger_window, config.bollinger_k),
        calculate_stddev(bars, config.bollinger_window),
        calculate_rolling_volatility(bars, config.volatility_window, config.annualization_factor),
    ]
}

pub fn analyze(series: &PriceSeries, config: &AnalyticsConfig) -> SymbolAnalysis {
    let bars = series.bars();

    SymbolAnalysis {
        symbol: series.symbol().to_string(),
        observations: bars.len(),
        first_date: series.first_date(),
        last_date: series.last_date(),
        last_close: bars.last().map(|b| b.close),
        indicators: compute_indicators(bars, config),
        risk: RiskSummary::compute(bars, config),
        drawdown: max_drawdown(bars),
        trend: classify_trend(bars, config),
        forecast: forecast(bars, &config.forecast),
        yearly: calendar_year_summary(bars, config.annualization_factor),
        performance: relative_performance(bars),
    }
}

/// Analyses keyed by symbol; the result does not depend on input order.
pub fn analyze_batch(
    series: &[PriceSeries],
    config: &AnalyticsConfig,
) -> BTreeMap<String, SymbolAnalysis> {
    series
        .iter()
        .map(|s| (s.symbol().to_string(), analyze(s, config)))
        .collect()
}
