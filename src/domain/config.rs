//! Tunable parameters for every analytics function.
//!
//! One explicit struct is passed by reference instead of process-wide
//! constants; `Default` carries the conventional values.

use serde::Serialize;

/// Trading days per year used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// SMA windows offered for the displayed moving average.
pub const SMA_WINDOWS: [usize; 4] = [20, 50, 100, 200];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsConfig {
    pub window_sma: usize,
    pub window_rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_window: usize,
    pub bollinger_k: f64,
    pub volatility_window: usize,
    pub risk_free_rate: f64,
    pub var_confidence: f64,
    pub annualization_factor: f64,
    pub trend_sma_window: usize,
    pub trend_threshold_pct: f64,
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastConfig {
    /// Calendar days projected past the last observation.
    pub horizon_days: usize,
    /// Fewest observations a fit is attempted on.
    pub min_history: usize,
    /// Seasonal cycle length in calendar days; `None` fits trend only.
    pub seasonal_period: Option<usize>,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            min_history: 60,
            seasonal_period: Some(7),
            max_iterations: 100,
            tolerance: 1e-9,
        }
    }
}

impl ForecastConfig {
    /// Observations required before fitting: the configured minimum, but never
    /// less than two full seasonal cycles.
    pub fn required_history(&self) -> usize {
        let cycles = self.seasonal_period.map_or(2, |p| p * 2);
        self.min_history.max(cycles).max(2)
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_sma: 20,
            window_rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_window: 20,
            bollinger_k: 2.0,
            volatility_window: 30,
            risk_free_rate: 0.02,
            var_confidence: 0.95,
            annualization_factor: TRADING_DAYS_PER_YEAR,
            trend_sma_window: 20,
            trend_threshold_pct: 5.0,
            forecast: ForecastConfig::default(),
        }
    }
}
