//! Configuration loading and validation.
//!
//! Reads every tunable from a [`ConfigPort`], falling back to the
//! [`AnalyticsConfig`] defaults, then rejects out-of-range values before any
//! analysis runs.

use crate::domain::config::{AnalyticsConfig, ForecastConfig, SMA_WINDOWS};
use crate::domain::error::AnalyticsError;
use crate::ports::config_port::ConfigPort;

pub fn build_analytics_config(config: &dyn ConfigPort) -> Result<AnalyticsConfig, AnalyticsError> {
    let defaults = AnalyticsConfig::default();
    let forecast_defaults = ForecastConfig::default();

    let seasonal_period = read_count(
        config,
        "forecast",
        "seasonal_period",
        forecast_defaults.seasonal_period.unwrap_or(0),
        true,
    )?;

    let built = AnalyticsConfig {
        window_sma: read_count(config, "indicators", "window_sma", defaults.window_sma, false)?,
        window_rsi: read_count(config, "indicators", "window_rsi", defaults.window_rsi, false)?,
        macd_fast: read_count(config, "indicators", "macd_fast", defaults.macd_fast, false)?,
        macd_slow: read_count(config, "indicators", "macd_slow", defaults.macd_slow, false)?,
        macd_signal: read_count(config, "indicators", "macd_signal", defaults.macd_signal, false)?,
        bollinger_window: read_count(
            config,
            "indicators",
            "bollinger_window",
            defaults.bollinger_window,
            false,
        )?,
        bollinger_k: config.get_double("indicators", "bollinger_k", defaults.bollinger_k),
        volatility_window: read_count(
            config,
            "indicators",
            "volatility_window",
            defaults.volatility_window,
            false,
        )?,
        risk_free_rate: config.get_double("risk", "risk_free_rate", defaults.risk_free_rate),
        var_confidence: config.get_double("risk", "var_confidence", defaults.var_confidence),
        annualization_factor: config.get_double(
            "risk",
            "annualization_factor",
            defaults.annualization_factor,
        ),
        trend_sma_window: read_count(config, "trend", "sma_window", defaults.trend_sma_window, false)?,
        trend_threshold_pct: config.get_double("trend", "threshold_pct", defaults.trend_threshold_pct),
        forecast: ForecastConfig {
            horizon_days: read_count(
                config,
                "forecast",
                "horizon_days",
                forecast_defaults.horizon_days,
                false,
            )?,
            min_history: read_count(
                config,
                "forecast",
                "min_history",
                forecast_defaults.min_history,
                true,
            )?,
            seasonal_period: if seasonal_period == 0 {
                None
            } else {
                Some(seasonal_period)
            },
            max_iterations: read_count(
                config,
                "forecast",
                "max_iterations",
                forecast_defaults.max_iterations,
                false,
            )?,
            tolerance: config.get_double("forecast", "tolerance", forecast_defaults.tolerance),
        },
    };

    validate_analytics_config(&built)?;
    Ok(built)
}

pub fn validate_analytics_config(config: &AnalyticsConfig) -> Result<(), AnalyticsError> {
    validate_sma_window(config)?;
    validate_windows(config)?;
    validate_macd(config)?;
    validate_bollinger_k(config)?;
    validate_risk_free_rate(config)?;
    validate_var_confidence(config)?;
    validate_annualization(config)?;
    validate_trend_threshold(config)?;
    validate_forecast(&config.forecast)?;
    Ok(())
}

fn read_count(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
    allow_zero: bool,
) -> Result<usize, AnalyticsError> {
    let value = config.get_int(section, key, default as i64);
    if value < 0 || (!allow_zero && value == 0) {
        let reason = if allow_zero {
            format!("{} must be non-negative", key)
        } else {
            format!("{} must be positive", key)
        };
        return Err(AnalyticsError::config_invalid(section, key, &reason));
    }
    Ok(value as usize)
}

fn validate_sma_window(config: &AnalyticsConfig) -> Result<(), AnalyticsError> {
    if !SMA_WINDOWS.contains(&config.window_sma) {
        return Err(AnalyticsError::config_invalid(
            "indicators",
            "window_sma",
            "window_sma must be one of 20, 50, 100, 200",
        ));
    }
    Ok(())
}

fn validate_windows(config: &AnalyticsConfig) -> Result<(), AnalyticsError> {
    let windows = [
        ("indicators", "window_rsi", config.window_rsi),
        ("indicators", "bollinger_window", config.bollinger_window),
        ("indicators", "volatility_window", config.volatility_window),
        ("trend", "sma_window", config.trend_sma_window),
    ];
    for (section, key, value) in windows {
        if value == 0 {
            return Err(AnalyticsError::config_invalid(
                section,
                key,
                &format!("{} must be positive", key),
            ));
        }
    }
    Ok(())
}

fn validate_macd(config: &AnalyticsConfig) -> Result<(), AnalyticsError> {
    if config.macd_fast == 0 || config.macd_slow == 0 || config.macd_signal == 0 {
        return Err(AnalyticsError::config_invalid(
            "indicators",
            "macd_fast",
            "MACD spans must be positive",
        ));
    }
    if config.macd_fast >= config.macd_slow {
        return Err(AnalyticsError::config_invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be shorter than macd_slow",
        ));
    }
    Ok(())
}

fn validate_bollinger_k(config: &AnalyticsConfig) -> Result<(), AnalyticsError> {
    if !(config.bollinger_k > 0.0 && config.bollinger_k.is_finite()) {
        return Err(AnalyticsError::config_invalid(
            "indicators",
            "bollinger_k",
            "bollinger_k must be positive and finite",
        ));
    }
    Ok(())
}

fn validate_risk_free_rate(config: &AnalyticsConfig) -> Result<(), AnalyticsError> {
    let value = config.risk_free_rate;
    if !(0.0..1.0).contains(&value) {
        return Err(AnalyticsError::config_invalid(
            "risk",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_var_confidence(config: &AnalyticsConfig) -> Result<(), AnalyticsError> {
    let value = config.var_confidence;
    if !(value > 0.0 && value < 1.0) {
        return Err(AnalyticsError::config_invalid(
            "risk",
            "var_confidence",
            "var_confidence must be strictly between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_annualization(config: &AnalyticsConfig) -> Result<(), AnalyticsError> {
    if !(config.annualization_factor > 0.0 && config.annualization_factor.is_finite()) {
        return Err(AnalyticsError::config_invalid(
            "risk",
            "annualization_factor",
            "annualization_factor must be positive and finite",
        ));
    }
    Ok(())
}

fn validate_trend_threshold(config: &AnalyticsConfig) -> Result<(), AnalyticsError> {
    if !(config.trend_threshold_pct >= 0.0 && config.trend_threshold_pct.is_finite()) {
        return Err(AnalyticsError::config_invalid(
            "trend",
            "threshold_pct",
            "threshold_pct must be non-negative and finite",
        ));
    }
    Ok(())
}

fn validate_forecast(forecast: &ForecastConfig) -> Result<(), AnalyticsError> {
    if forecast.horizon_days == 0 {
        return Err(AnalyticsError::config_invalid(
            "forecast",
            "horizon_days",
            "horizon_days must be positive",
        ));
    }
    if forecast.max_iterations == 0 {
        return Err(AnalyticsError::config_invalid(
            "forecast",
            "max_iterations",
            "max_iterations must be positive",
        ));
    }
    if !(forecast.tolerance > 0.0 && forecast.tolerance.is_finite()) {
        return Err(AnalyticsError::config_invalid(
            "forecast",
            "tolerance",
            "tolerance must be positive and finite",
        ));
    }
    Ok(())
}
