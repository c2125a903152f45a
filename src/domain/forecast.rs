//! Short-horizon forecast by trend + seasonality decomposition.
//!
//! Fitting sits behind [`TrendFitter`] and [`TrendModel`] so the decomposition
//! can be swapped without touching callers. The built-in
//! [`LinearSeasonalFitter`] fits
//!
//! close(t) ≈ a + b·t + s[t mod p]
//!
//! where `t` is days since the first observation and `s` an additive seasonal
//! profile of period `p` calendar days, centred to mean zero over the
//! observations. Trend and season are estimated alternately (backfitting)
//! until the parameters move less than the tolerance or the iteration cap is
//! reached.

use crate::domain::config::ForecastConfig;
use crate::domain::error::MetricError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::stats;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, warn};

/// Two-sided 80% normal quantile used for the forecast band.
pub const INTERVAL_Z: f64 = 1.2816;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ForecastKind {
    Fitted,
    Projected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub kind: ForecastKind,
    /// Observed close, for fitted points.
    pub actual: Option<f64>,
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
}

pub trait TrendModel: Send + Sync {
    /// Model estimate at every historical date.
    fn fitted(&self) -> Vec<ForecastPoint>;

    /// Estimates for `horizon` consecutive calendar days after the last
    /// observation.
    fn extrapolate(&self, horizon: usize) -> Vec<ForecastPoint>;

    /// Trend slope in price units per calendar day.
    fn daily_slope(&self) -> f64;
}

pub trait TrendFitter {
    fn fit(&self, bars: &[OhlcvBar]) -> Result<Box<dyn TrendModel>, MetricError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub horizon_days: usize,
    pub daily_slope: f64,
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    pub fn projected(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points
            .iter()
            .filter(|p| p.kind == ForecastKind::Projected)
    }

    pub fn fitted(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter().filter(|p| p.kind == ForecastKind::Fitted)
    }
}

/// Fits the configured model and extends it by `config.horizon_days`.
pub fn forecast(bars: &[OhlcvBar], config: &ForecastConfig) -> Result<Forecast, MetricError> {
    let fitter = LinearSeasonalFitter::new(config.clone());
    forecast_with(&fitter, bars, config.horizon_days)
}

pub fn forecast_with(
    fitter: &dyn TrendFitter,
    bars: &[OhlcvBar],
    horizon: usize,
) -> Result<Forecast, MetricError> {
    let model = fitter.fit(bars)?;
    let mut points = model.fitted();
    points.extend(model.extrapolate(horizon));

    Ok(Forecast {
        horizon_days: horizon,
        daily_slope: model.daily_slope(),
        points,
    })
}

#[derive(Debug, Clone)]
pub struct LinearSeasonalFitter {
    config: ForecastConfig,
}

impl LinearSeasonalFitter {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }
}

impl TrendFitter for LinearSeasonalFitter {
    fn fit(&self, bars: &[OhlcvBar]) -> Result<Box<dyn TrendModel>, MetricError> {
        let required = self.config.required_history();
        if bars.len() < required {
            return Err(MetricError::InsufficientHistory {
                required,
                available: bars.len(),
            });
        }
        if bars.iter().any(|b| !b.close.is_finite()) {
            return Err(MetricError::invalid("close", "prices must be finite"));
        }

        let origin = bars[0].date;
        let offsets: Vec<i64> = bars.iter().map(|b| (b.date - origin).num_days()).collect();
        let t: Vec<f64> = offsets.iter().map(|&d| d as f64).collect();
        let y: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let period = self.config.seasonal_period.filter(|p| *p > 1);
        let keys: Vec<usize> = match period {
            Some(p) => offsets
                .iter()
                .map(|d| d.rem_euclid(p as i64) as usize)
                .collect(),
            None => Vec::new(),
        };

        let mut seasonal = vec![0.0; period.unwrap_or(0)];
        let mut intercept = 0.0;
        let mut slope = 0.0;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            iterations += 1;

            let deseasoned: Vec<f64> = y
                .iter()
                .enumerate()
                .map(|(i, v)| v - seasonal_at(&seasonal, &keys, i))
                .collect();
            let (a, b) = least_squares(&t, &deseasoned)?;
            let mut change = (a - intercept).abs() + (b - slope).abs();
            intercept = a;
            slope = b;

            if let Some(p) = period {
                let next = seasonal_profile(&t, &y, &keys, p, intercept, slope);
                let shift = next
                    .iter()
                    .zip(&seasonal)
                    .map(|(n, s)| (n - s).abs())
                    .fold(0.0, f64::max);
                change += shift;
                seasonal = next;
            }

            if change < self.config.tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            debug!(iterations, slope, "forecast fit converged");
        } else {
            warn!(
                iterations,
                tolerance = self.config.tolerance,
                "forecast fit stopped at the iteration cap before converging"
            );
        }

        let residuals: Vec<f64> = y
            .iter()
            .enumerate()
            .map(|(i, v)| v - (intercept + slope * t[i] + seasonal_at(&seasonal, &keys, i)))
            .collect();
        let residual_std = stats::sample_std_dev(&residuals).unwrap_or(0.0);

        Ok(Box::new(LinearSeasonalModel {
            origin,
            history: bars.iter().map(|b| (b.date, b.close)).collect(),
            intercept,
            slope,
            seasonal,
            residual_std,
        }))
    }
}

fn seasonal_at(seasonal: &[f64], keys: &[usize], i: usize) -> f64 {
    keys.get(i).map_or(0.0, |&k| seasonal[k])
}

/// Mean detrended residual per phase, centred so the profile averages to
/// zero over the observations. Phases never observed stay at zero.
fn seasonal_profile(
    t: &[f64],
    y: &[f64],
    keys: &[usize],
    period: usize,
    intercept: f64,
    slope: f64,
) -> Vec<f64> {
    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, &k) in keys.iter().enumerate() {
        sums[k] += y[i] - (intercept + slope * t[i]);
        counts[k] += 1;
    }

    let mut profile: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();

    let offset = keys.iter().map(|&k| profile[k]).sum::<f64>() / keys.len().max(1) as f64;
    for (value, &count) in profile.iter_mut().zip(&counts) {
        if count > 0 {
            *value -= offset;
        }
    }
    profile
}

fn least_squares(x: &[f64], y: &[f64]) -> Result<(f64, f64), MetricError> {
    let (Some(mean_x), Some(mean_y)) = (stats::mean(x), stats::mean(y)) else {
        return Err(MetricError::InsufficientData {
            required: 2,
            available: x.len(),
        });
    };

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        sxx += (xi - mean_x).powi(2);
        sxy += (xi - mean_x) * (yi - mean_y);
    }
    if sxx == 0.0 {
        return Err(MetricError::degenerate(
            "forecast",
            "observations share a single date",
        ));
    }

    let slope = sxy / sxx;
    Ok((mean_y - slope * mean_x, slope))
}

struct LinearSeasonalModel {
    origin: NaiveDate,
    history: Vec<(NaiveDate, f64)>,
    intercept: f64,
    slope: f64,
    seasonal: Vec<f64>,
    residual_std: f64,
}

impl LinearSeasonalModel {
    fn estimate_at(&self, date: NaiveDate) -> f64 {
        let offset = (date - self.origin).num_days();
        let mut value = self.intercept + self.slope * offset as f64;
        if !self.seasonal.is_empty() {
            value += self.seasonal[offset.rem_euclid(self.seasonal.len() as i64) as usize];
        }
        value
    }

    fn point(&self, date: NaiveDate, kind: ForecastKind, actual: Option<f64>) -> ForecastPoint {
        let estimate = self.estimate_at(date);
        let margin = INTERVAL_Z * self.residual_std;
        ForecastPoint {
            date,
            kind,
            actual,
            estimate,
            lower: estimate - margin,
            upper: estimate + margin,
        }
    }
}

impl TrendModel for LinearSeasonalModel {
    fn fitted(&self) -> Vec<ForecastPoint> {
        self.history
            .iter()
            .map(|&(date, close)| self.point(date, ForecastKind::Fitted, Some(close)))
            .collect()
    }

    fn extrapolate(&self, horizon: usize) -> Vec<ForecastPoint> {
        let Some(&(last, _)) = self.history.last() else {
            return Vec::new();
        };
        (1..=horizon as i64)
            .map_while(|d| last.checked_add_signed(Duration::days(d)))
            .map(|date| self.point(date, ForecastKind::Projected, None))
            .collect()
    }

    fn daily_slope(&self) -> f64 {
        self.slope
    }
}
