//! Daily return series and the summaries derived directly from it.
//!
//! r[i] = close[i] / close[i-1] - 1. The first entry is undefined, as is any
//! entry whose previous close is not positive.

use crate::domain::error::MetricError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::stats;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Close prices rebased to the first observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub normalized: f64,
    pub log_normalized: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub observations: usize,
    pub annual_return: Option<f64>,
    pub volatility: Option<f64>,
}

pub fn daily_returns(bars: &[OhlcvBar]) -> Vec<ReturnPoint> {
    let mut out = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let value = if i == 0 {
            None
        } else {
            simple_return(bars[i - 1].close, bar.close)
        };
        out.push(ReturnPoint {
            date: bar.date,
            value,
        });
    }
    out
}

fn simple_return(prev: f64, curr: f64) -> Option<f64> {
    if prev > 0.0 {
        let r = curr / prev - 1.0;
        r.is_finite().then_some(r)
    } else {
        None
    }
}

/// Defined returns only, in date order.
pub fn valid_returns(returns: &[ReturnPoint]) -> Vec<f64> {
    returns.iter().filter_map(|r| r.value).collect()
}

/// Every return metric needs at least two observations.
pub(crate) fn require_returns(returns: &[f64]) -> Result<(), MetricError> {
    if returns.len() < 2 {
        return Err(MetricError::InsufficientData {
            required: 2,
            available: returns.len(),
        });
    }
    Ok(())
}

pub(crate) fn require_factor(annualization_factor: f64) -> Result<(), MetricError> {
    if !(annualization_factor > 0.0) || !annualization_factor.is_finite() {
        return Err(MetricError::invalid(
            "annualization_factor",
            "must be a positive number",
        ));
    }
    Ok(())
}

/// Mean daily return compounded over one year: (1 + mean)^factor - 1.
pub fn compounded_annual_return(
    returns: &[f64],
    annualization_factor: f64,
) -> Result<f64, MetricError> {
    require_returns(returns)?;
    require_factor(annualization_factor)?;

    let mean = stats::mean(returns).unwrap_or(0.0);
    let value = (1.0 + mean).powf(annualization_factor) - 1.0;
    if !value.is_finite() {
        return Err(MetricError::degenerate(
            "compounded_annual_return",
            "compounding overflowed",
        ));
    }
    Ok(value)
}

pub fn relative_performance(bars: &[OhlcvBar]) -> Result<Vec<PerformancePoint>, MetricError> {
    let Some(first) = bars.first() else {
        return Ok(Vec::new());
    };
    if !(first.close > 0.0) {
        return Err(MetricError::invalid(
            "close",
            "first close must be positive to rebase a series",
        ));
    }

    Ok(bars
        .iter()
        .map(|bar| {
            let normalized = bar.close / first.close;
            PerformancePoint {
                date: bar.date,
                normalized,
                log_normalized: normalized.ln(),
                percent: (normalized - 1.0) * 100.0,
            }
        })
        .collect())
}

/// Annualized mean return and volatility per calendar year.
///
/// Each return belongs to the year of the date it is observed on. Years with
/// fewer than two returns carry no figures.
pub fn calendar_year_summary(bars: &[OhlcvBar], annualization_factor: f64) -> Vec<YearSummary> {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for point in daily_returns(bars) {
        if let Some(r) = point.value {
            by_year.entry(point.date.year()).or_default().push(r);
        }
    }

    by_year
        .into_iter()
        .map(|(year, returns)| {
            let enough = returns.len() >= 2;
            YearSummary {
                year,
                observations: returns.len(),
                annual_return: stats::mean(&returns)
                    .filter(|_| enough)
                    .map(|m| m * annualization_factor),
                volatility: stats::sample_std_dev(&returns)
                    .map(|s| s * annualization_factor.sqrt()),
            }
        })
        .collect()
}
