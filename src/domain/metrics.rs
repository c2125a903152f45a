//! Return and risk metrics.
//!
//! Every scalar reduces the defined daily returns of a series; the first,
//! undefined return is dropped before any metric sees the data. Standard
//! deviations are sample estimates. Results are `Err` rather than NaN or
//! infinity whenever a metric is undefined.

use crate::domain::config::AnalyticsConfig;
use crate::domain::error::{serialize_outcome, MetricError};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::returns::{
    compounded_annual_return, daily_returns, require_factor, require_returns, valid_returns,
};
use crate::domain::stats;
use chrono::NaiveDate;
use serde::Serialize;

/// Mean daily return × annualization factor.
pub fn annualized_return(returns: &[f64], annualization_factor: f64) -> Result<f64, MetricError> {
    require_returns(returns)?;
    require_factor(annualization_factor)?;
    let mean = stats::mean(returns).unwrap_or(0.0);
    Ok(mean * annualization_factor)
}

/// Sample standard deviation of daily returns × √annualization factor.
pub fn annualized_volatility(
    returns: &[f64],
    annualization_factor: f64,
) -> Result<f64, MetricError> {
    require_returns(returns)?;
    require_factor(annualization_factor)?;
    let std = stats::sample_std_dev(returns).unwrap_or(0.0);
    Ok(std * annualization_factor.sqrt())
}

/// Relative spread below which a sample deviation is rounding noise.
const DISPERSION_EPSILON: f64 = 1e-10;

/// True when `std` is zero, or negligible next to the mean of `values`.
/// Constant compounding leaves a last-bit spread in the returns that would
/// otherwise blow a ratio up to ~1e15.
fn negligible_dispersion(std: f64, values: &[f64]) -> bool {
    let scale = stats::mean(values).map_or(0.0, f64::abs);
    std == 0.0 || std <= DISPERSION_EPSILON * scale
}

pub fn sharpe_ratio(
    returns: &[f64],
    risk_free_rate: f64,
    annualization_factor: f64,
) -> Result<f64, MetricError> {
    let annual = annualized_return(returns, annualization_factor)?;
    let volatility = annualized_volatility(returns, annualization_factor)?;
    let daily_std = stats::sample_std_dev(returns).unwrap_or(0.0);
    if negligible_dispersion(daily_std, returns) {
        return Err(MetricError::degenerate("sharpe_ratio", "volatility is zero"));
    }
    Ok((annual - risk_free_rate) / volatility)
}

/// Sharpe numerator over the annualized sample deviation of the strictly
/// negative returns.
///
/// Fewer than two negative returns leave the downside deviation without a
/// sample estimate, so the ratio is undefined in that case too.
pub fn sortino_ratio(
    returns: &[f64],
    risk_free_rate: f64,
    annualization_factor: f64,
) -> Result<f64, MetricError> {
    let annual = annualized_return(returns, annualization_factor)?;

    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let Some(downside_std) = stats::sample_std_dev(&downside) else {
        return Err(MetricError::degenerate(
            "sortino_ratio",
            &format!("{} negative returns, need at least 2", downside.len()),
        ));
    };

    let downside_deviation = downside_std * annualization_factor.sqrt();
    if negligible_dispersion(downside_std, &downside) {
        return Err(MetricError::degenerate(
            "sortino_ratio",
            "downside deviation is zero",
        ));
    }
    Ok((annual - risk_free_rate) / downside_deviation)
}

/// Historical VaR: the `(1 - confidence)` quantile of daily returns, linearly
/// interpolated. Signed, so a loss is negative.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> Result<f64, MetricError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(MetricError::invalid(
            "confidence",
            "must be strictly between 0 and 1",
        ));
    }
    require_returns(returns)?;

    stats::percentile(returns, 1.0 - confidence).ok_or_else(|| {
        MetricError::degenerate("value_at_risk", "quantile could not be computed")
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    pub cumulative: f64,
    pub peak: f64,
    pub drawdown: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownReport {
    pub points: Vec<DrawdownPoint>,
    /// Deepest drawdown; never positive.
    pub max_drawdown: f64,
    /// Running peak preceding the deepest drawdown, if the series ever fell.
    pub peak_date: Option<NaiveDate>,
    pub trough_date: Option<NaiveDate>,
    /// Longest run of consecutive observations below the running peak.
    pub longest_underwater: usize,
}

/// Drawdown of the cumulative return index.
///
/// The index starts at 1.0 on the first date and compounds each defined
/// return; undefined returns leave it unchanged.
pub fn max_drawdown(bars: &[OhlcvBar]) -> Result<DrawdownReport, MetricError> {
    if bars.is_empty() {
        return Err(MetricError::InsufficientData {
            required: 1,
            available: 0,
        });
    }

    let returns = daily_returns(bars);
    let mut points = Vec::with_capacity(returns.len());

    let mut cumulative = 1.0_f64;
    let mut peak = 1.0_f64;
    let mut running_peak_date = bars[0].date;

    let mut max_dd = 0.0_f64;
    let mut peak_date = None;
    let mut trough_date = None;
    let mut underwater = 0usize;
    let mut longest_underwater = 0usize;

    for point in &returns {
        cumulative *= 1.0 + point.value.unwrap_or(0.0);
        if cumulative > peak {
            peak = cumulative;
            running_peak_date = point.date;
        }

        let drawdown = cumulative / peak - 1.0;
        if drawdown < max_dd {
            max_dd = drawdown;
            peak_date = Some(running_peak_date);
            trough_date = Some(point.date);
        }

        if drawdown < 0.0 {
            underwater += 1;
            longest_underwater = longest_underwater.max(underwater);
        } else {
            underwater = 0;
        }

        points.push(DrawdownPoint {
            date: point.date,
            cumulative,
            peak,
            drawdown,
        });
    }

    Ok(DrawdownReport {
        points,
        max_drawdown: max_dd,
        peak_date,
        trough_date,
        longest_underwater,
    })
}

/// Risk and performance record for one series. Each field is independent;
/// an undefined metric does not hide the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub observations: usize,
    #[serde(serialize_with = "serialize_outcome")]
    pub annual_return: Result<f64, MetricError>,
    #[serde(serialize_with = "serialize_outcome")]
    pub compounded_annual_return: Result<f64, MetricError>,
    #[serde(serialize_with = "serialize_outcome")]
    pub volatility: Result<f64, MetricError>,
    #[serde(serialize_with = "serialize_outcome")]
    pub sharpe_ratio: Result<f64, MetricError>,
    #[serde(serialize_with = "serialize_outcome")]
    pub sortino_ratio: Result<f64, MetricError>,
    #[serde(serialize_with = "serialize_outcome")]
    pub value_at_risk: Result<f64, MetricError>,
    #[serde(serialize_with = "serialize_outcome")]
    pub max_drawdown: Result<f64, MetricError>,
}

impl RiskSummary {
    pub fn compute(bars: &[OhlcvBar], config: &AnalyticsConfig) -> Self {
        let returns = valid_returns(&daily_returns(bars));
        let factor = config.annualization_factor;
        let rf = config.risk_free_rate;

        RiskSummary {
            observations: returns.len(),
            annual_return: annualized_return(&returns, factor),
            compounded_annual_return: compounded_annual_return(&returns, factor),
            volatility: annualized_volatility(&returns, factor),
            sharpe_ratio: sharpe_ratio(&returns, rf, factor),
            sortino_ratio: sortino_ratio(&returns, rf, factor),
            value_at_risk: value_at_risk(&returns, config.var_confidence),
            max_drawdown: max_drawdown(bars).map(|report| report.max_drawdown),
        }
    }
}
