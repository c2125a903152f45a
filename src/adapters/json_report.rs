//! JSON report adapter.
//!
//! Undefined metrics appear as `{"undefined": "<reason>"}` in place of the
//! number.

use crate::domain::analysis::SymbolAnalysis;
use crate::domain::correlation::CorrelationMatrix;
use crate::domain::error::{serialize_outcome, AnalyticsError, MetricError};
use crate::domain::forecast::Forecast;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::metrics::{DrawdownReport, RiskSummary};
use crate::ports::report_port::ReportPort;
use serde::{Serialize, Serializer};
use serde_json::json;
use std::collections::BTreeMap;

pub struct JsonReport;

fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, AnalyticsError> {
    serde_json::to_string_pretty(value).map_err(|e| AnalyticsError::Report {
        reason: format!("JSON serialization failed: {}", e),
    })
}

#[derive(Serialize)]
struct RiskReport<'a> {
    symbol: &'a str,
    risk: &'a RiskSummary,
    #[serde(serialize_with = "borrowed_outcome")]
    drawdown: &'a Result<DrawdownReport, MetricError>,
}

fn borrowed_outcome<T, S>(value: &&Result<T, MetricError>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    serialize_outcome(*value, serializer)
}

impl ReportPort for JsonReport {
    fn analysis(&self, analysis: &SymbolAnalysis) -> Result<String, AnalyticsError> {
        render(analysis)
    }

    fn indicators(
        &self,
        symbol: &str,
        series: &[IndicatorSeries],
    ) -> Result<String, AnalyticsError> {
        let indicators: BTreeMap<String, &IndicatorSeries> = series
            .iter()
            .map(|s| (s.indicator_type.to_string(), s))
            .collect();
        render(&json!({ "symbol": symbol, "indicators": indicators }))
    }

    fn risk(
        &self,
        symbol: &str,
        risk: &RiskSummary,
        drawdown: &Result<DrawdownReport, MetricError>,
    ) -> Result<String, AnalyticsError> {
        render(&RiskReport {
            symbol,
            risk,
            drawdown,
        })
    }

    fn forecast(&self, symbol: &str, forecast: &Forecast) -> Result<String, AnalyticsError> {
        render(&json!({ "symbol": symbol, "forecast": forecast }))
    }

    fn comparison(
        &self,
        analyses: &BTreeMap<String, SymbolAnalysis>,
        correlation: &CorrelationMatrix,
    ) -> Result<String, AnalyticsError> {
        let summaries: BTreeMap<&String, &RiskSummary> =
            analyses.iter().map(|(k, a)| (k, &a.risk)).collect();
        render(&json!({ "risk": summaries, "correlation": correlation }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::AnalyticsConfig;
    use crate::domain::metrics::max_drawdown;
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::{Duration, NaiveDate};

    fn bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvBar::flat(start + Duration::days(i as i64), c))
            .collect()
    }

    #[test]
    fn risk_report_marks_undefined_metrics() {
        let bars = bars(&[100.0; 10]);
        let risk = RiskSummary::compute(&bars, &AnalyticsConfig::default());
        let out = JsonReport.risk("FLAT", &risk, &max_drawdown(&bars)).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["symbol"], "FLAT");
        assert_eq!(value["risk"]["max_drawdown"], 0.0);
        assert!(value["risk"]["sharpe_ratio"]["undefined"]
            .as_str()
            .unwrap()
            .contains("volatility is zero"));
        assert_eq!(value["drawdown"]["points"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn undefined_indicator_points_are_null() {
        let bars = bars(&[1.0, 2.0, 3.0]);
        let series = vec![crate::domain::indicator::calculate_sma(&bars, 2)];
        let out = JsonReport.indicators("X", &series).unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let points = value["indicators"]["SMA(2)"]["values"].as_array().unwrap();
        assert!(points[0]["value"].is_null());
        assert_eq!(points[1]["value"], 1.5);
        assert_eq!(points[1]["date"], "2024-01-02");
    }
}
