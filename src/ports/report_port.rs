//! Report rendering port.

use crate::domain::analysis::SymbolAnalysis;
use crate::domain::correlation::CorrelationMatrix;
use crate::domain::error::{AnalyticsError, MetricError};
use crate::domain::forecast::Forecast;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::metrics::{DrawdownReport, RiskSummary};
use std::collections::BTreeMap;

/// Renders analysis results into the text written to stdout.
pub trait ReportPort {
    fn analysis(&self, analysis: &SymbolAnalysis) -> Result<String, AnalyticsError>;

    fn indicators(
        &self,
        symbol: &str,
        series: &[IndicatorSeries],
    ) -> Result<String, AnalyticsError>;

    fn risk(
        &self,
        symbol: &str,
        risk: &RiskSummary,
        drawdown: &Result<DrawdownReport, MetricError>,
    ) -> Result<String, AnalyticsError>;

    fn forecast(&self, symbol: &str, forecast: &Forecast) -> Result<String, AnalyticsError>;

    fn comparison(
        &self,
        analyses: &BTreeMap<String, SymbolAnalysis>,
        correlation: &CorrelationMatrix,
    ) -> Result<String, AnalyticsError>;
}
