//! Domain error types.

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A numeric condition local to one indicator or metric call.
///
/// Every variant stands for "this value is undefined" with a reason attached,
/// so callers never confuse an undefined result with a computed zero.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    #[error("missing required column: {column}")]
    MissingColumn { column: String },

    #[error("insufficient data: need {required} observations, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("insufficient history for forecast: need {required} observations, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("{metric} is undefined: {reason}")]
    DegenerateMetric { metric: String, reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl MetricError {
    pub(crate) fn degenerate(metric: &str, reason: &str) -> Self {
        MetricError::DegenerateMetric {
            metric: metric.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid(name: &str, reason: &str) -> Self {
        MetricError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Writes a metric outcome as its value, or as `{"undefined": reason}`.
pub(crate) fn serialize_outcome<T, S>(
    value: &Result<T, MetricError>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Ok(v) => v.serialize(serializer),
        Err(e) => {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry("undefined", &e.to_string())?;
            map.end()
        }
    }
}

/// Top-level error type for assetlens.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("series for {symbol} is not strictly increasing at {date}")]
    UnorderedSeries { symbol: String, date: NaiveDate },

    #[error("invalid close {close} for {symbol} at {date}: prices must be finite and positive")]
    InvalidPrice {
        symbol: String,
        date: NaiveDate,
        close: f64,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalyticsError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: &str) -> Self {
        AnalyticsError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            AnalyticsError::Io(_) | AnalyticsError::Report { .. } => 1,
            AnalyticsError::ConfigParse { .. }
            | AnalyticsError::ConfigMissing { .. }
            | AnalyticsError::ConfigInvalid { .. } => 2,
            AnalyticsError::DataSource { .. } => 3,
            AnalyticsError::NoData { .. }
            | AnalyticsError::UnorderedSeries { .. }
            | AnalyticsError::InvalidPrice { .. }
            | AnalyticsError::Metric(_) => 5,
        }
    }
}

impl From<&AnalyticsError> for std::process::ExitCode {
    fn from(err: &AnalyticsError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
