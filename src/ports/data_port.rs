//! Series loader port.

use crate::domain::error::AnalyticsError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

/// Inclusive date bounds; an open end takes everything on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

pub trait DataPort {
    /// Ordered series for `symbol` restricted to `range`.
    fn fetch_series(&self, symbol: &str, range: DateRange) -> Result<PriceSeries, AnalyticsError>;

    fn list_symbols(&self) -> Result<Vec<String>, AnalyticsError>;
}
