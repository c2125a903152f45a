//! Plain-text report adapter.
//!
//! Fixed-width tables for terminal output. Percentages carry two decimals,
//! prices and indicator values four.

use crate::domain::analysis::SymbolAnalysis;
use crate::domain::correlation::CorrelationMatrix;
use crate::domain::error::{AnalyticsError, MetricError};
use crate::domain::forecast::{Forecast, ForecastKind};
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorValue};
use crate::domain::metrics::{DrawdownReport, RiskSummary};
use crate::domain::trend::TrendLabel;
use crate::ports::report_port::ReportPort;
use std::collections::BTreeMap;

pub struct TextReport;

fn pct(value: &Result<f64, MetricError>) -> String {
    match value {
        Ok(v) => format!("{:.2}%", v * 100.0),
        Err(e) => format!("n/a ({})", e),
    }
}

fn ratio(value: &Result<f64, MetricError>) -> String {
    match value {
        Ok(v) => format!("{:.2}", v),
        Err(e) => format!("n/a ({})", e),
    }
}

/// Short form used inside tables: the reason is dropped.
fn short_pct(value: &Result<f64, MetricError>) -> String {
    value
        .as_ref()
        .map(|v| format!("{:.2}%", v * 100.0))
        .unwrap_or_else(|_| "n/a".to_string())
}

fn short_ratio(value: &Result<f64, MetricError>) -> String {
    value
        .as_ref()
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|_| "n/a".to_string())
}

pub fn format_point(point: &IndicatorPoint) -> String {
    match &point.value {
        None => "-".to_string(),
        Some(IndicatorValue::Simple(v)) => format!("{:.4}", v),
        Some(IndicatorValue::Macd {
            line,
            signal,
            histogram,
        }) => format!("{:.4}/{:.4}/{:.4}", line, signal, histogram),
        Some(IndicatorValue::Bollinger {
            upper,
            middle,
            lower,
        }) => format!("{:.4}/{:.4}/{:.4}", upper, middle, lower),
    }
}

/// Left-aligned columns separated by two spaces.
pub fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = w))
            .collect();
        let mut s = padded.join("  ").trim_end().to_string();
        s.push('\n');
        s
    };

    let mut output = line(headers);
    for row in rows {
        output.push_str(&line(row));
    }
    output
}

fn risk_lines(risk: &RiskSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("Returns used:       {}\n", risk.observations));
    output.push_str(&format!("Annual return:      {}\n", pct(&risk.annual_return)));
    output.push_str(&format!(
        "Compounded annual:  {}\n",
        pct(&risk.compounded_annual_return)
    ));
    output.push_str(&format!("Volatility:         {}\n", pct(&risk.volatility)));
    output.push_str(&format!("Sharpe ratio:       {}\n", ratio(&risk.sharpe_ratio)));
    output.push_str(&format!("Sortino ratio:      {}\n", ratio(&risk.sortino_ratio)));
    output.push_str(&format!("Value at risk:      {}\n", pct(&risk.value_at_risk)));
    output.push_str(&format!("Max drawdown:       {}\n", pct(&risk.max_drawdown)));
    output
}

fn drawdown_lines(drawdown: &Result<DrawdownReport, MetricError>) -> String {
    match drawdown {
        Ok(report) => match (report.peak_date, report.trough_date) {
            (Some(peak), Some(trough)) => format!(
                "Deepest drawdown:   {:.2}% from {} to {}\nLongest underwater: {} observations\n",
                report.max_drawdown * 100.0,
                peak,
                trough,
                report.longest_underwater
            ),
            _ => "Deepest drawdown:   none\n".to_string(),
        },
        Err(e) => format!("Drawdown:           n/a ({})\n", e),
    }
}

fn forecast_lines(forecast: &Forecast) -> String {
    let mut output = format!(
        "Trend slope:        {:+.4} per day\n",
        forecast.daily_slope
    );
    if let Some(last) = forecast.projected().last() {
        output.push_str(&format!(
            "{} estimate:  {:.4} [{:.4}, {:.4}]\n",
            last.date, last.estimate, last.lower, last.upper
        ));
    }
    output
}

impl ReportPort for TextReport {
    fn analysis(&self, a: &SymbolAnalysis) -> Result<String, AnalyticsError> {
        let mut output = format!("=== {} ===\n", a.symbol);

        match (a.first_date, a.last_date) {
            (Some(first), Some(last)) => output.push_str(&format!(
                "Observations:       {} ({} to {})\n",
                a.observations, first, last
            )),
            _ => output.push_str("Observations:       0\n"),
        }
        if let Some(close) = a.last_close {
            output.push_str(&format!("Last close:         {:.4}\n", close));
        }
        if let Some(last) = a.performance.as_ref().ok().and_then(|p| p.last()) {
            output.push_str(&format!("Since first close:  {:+.2}%\n", last.percent));
        }

        output.push_str("\n--- Latest indicators ---\n");
        for series in &a.indicators {
            let value = series
                .latest()
                .map(format_point)
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!("{:<20}{}\n", series.indicator_type.to_string(), value));
        }

        output.push_str("\n--- Risk ---\n");
        output.push_str(&risk_lines(&a.risk));
        output.push_str(&drawdown_lines(&a.drawdown));

        output.push_str("\n--- Trend ---\n");
        if let Some(latest) = a.latest_trend() {
            match latest.pct_deviation {
                Some(dev) => output.push_str(&format!(
                    "Latest:             {} ({:+.2}% from average)\n",
                    latest.label, dev
                )),
                None => output.push_str(&format!(
                    "Latest:             {} (average undefined)\n",
                    latest.label
                )),
            }
        }
        let count = |label: TrendLabel| a.trend.iter().filter(|p| p.label == label).count();
        output.push_str(&format!(
            "Days:               {} up, {} down, {} stable\n",
            count(TrendLabel::Uptrend),
            count(TrendLabel::Downtrend),
            count(TrendLabel::Stable)
        ));

        output.push_str("\n--- Forecast ---\n");
        match &a.forecast {
            Ok(forecast) => output.push_str(&forecast_lines(forecast)),
            Err(e) => output.push_str(&format!("n/a ({})\n", e)),
        }

        if !a.yearly.is_empty() {
            output.push_str("\n--- Calendar years ---\n");
            let headers = ["year", "returns", "annual return", "volatility"].map(String::from);
            let rows: Vec<Vec<String>> = a
                .yearly
                .iter()
                .map(|y| {
                    vec![
                        y.year.to_string(),
                        y.observations.to_string(),
                        y.annual_return
                            .map(|v| format!("{:.2}%", v * 100.0))
                            .unwrap_or_else(|| "n/a".to_string()),
                        y.volatility
                            .map(|v| format!("{:.2}%", v * 100.0))
                            .unwrap_or_else(|| "n/a".to_string()),
                    ]
                })
                .collect();
            output.push_str(&format_table(&headers, &rows));
        }

        Ok(output)
    }

    fn indicators(
        &self,
        symbol: &str,
        series: &[IndicatorSeries],
    ) -> Result<String, AnalyticsError> {
        let mut headers = vec!["date".to_string()];
        headers.extend(series.iter().map(|s| s.indicator_type.to_string()));

        let len = series.iter().map(|s| s.len()).max().unwrap_or(0);
        let rows: Vec<Vec<String>> = (0..len)
            .map(|i| {
                let date = series
                    .iter()
                    .find_map(|s| s.values.get(i))
                    .map(|p| p.date.to_string())
                    .unwrap_or_default();
                let mut row = vec![date];
                row.extend(series.iter().map(|s| {
                    s.values
                        .get(i)
                        .map(format_point)
                        .unwrap_or_else(|| "-".to_string())
                }));
                row
            })
            .collect();

        let mut output = format!("=== {} indicators ===\n", symbol);
        output.push_str(&format_table(&headers, &rows));
        Ok(output)
    }

    fn risk(
        &self,
        symbol: &str,
        risk: &RiskSummary,
        drawdown: &Result<DrawdownReport, MetricError>,
    ) -> Result<String, AnalyticsError> {
        let mut output = format!("=== {} risk ===\n", symbol);
        output.push_str(&risk_lines(risk));
        output.push_str(&drawdown_lines(drawdown));
        Ok(output)
    }

    fn forecast(&self, symbol: &str, forecast: &Forecast) -> Result<String, AnalyticsError> {
        let mut output = format!(
            "=== {} forecast ({} days) ===\n",
            symbol, forecast.horizon_days
        );
        output.push_str(&forecast_lines(forecast));

        let headers = ["date", "kind", "actual", "estimate", "lower", "upper"].map(String::from);
        let rows: Vec<Vec<String>> = forecast
            .points
            .iter()
            .filter(|p| p.kind == ForecastKind::Projected)
            .map(|p| {
                vec![
                    p.date.to_string(),
                    "projected".to_string(),
                    p.actual
                        .map(|v| format!("{:.4}", v))
                        .unwrap_or_else(|| "-".to_string()),
                    format!("{:.4}", p.estimate),
                    format!("{:.4}", p.lower),
                    format!("{:.4}", p.upper),
                ]
            })
            .collect();
        output.push_str(&format_table(&headers, &rows));
        Ok(output)
    }

    fn comparison(
        &self,
        analyses: &BTreeMap<String, SymbolAnalysis>,
        correlation: &CorrelationMatrix,
    ) -> Result<String, AnalyticsError> {
        let headers = [
            "symbol",
            "obs",
            "annual return",
            "volatility",
            "sharpe",
            "sortino",
            "VaR",
            "max drawdown",
            "trend",
        ]
        .map(String::from);
        let rows: Vec<Vec<String>> = analyses
            .values()
            .map(|a| {
                vec![
                    a.symbol.clone(),
                    a.observations.to_string(),
                    short_pct(&a.risk.annual_return),
                    short_pct(&a.risk.volatility),
                    short_ratio(&a.risk.sharpe_ratio),
                    short_ratio(&a.risk.sortino_ratio),
                    short_pct(&a.risk.value_at_risk),
                    short_pct(&a.risk.max_drawdown),
                    a.latest_trend()
                        .map(|t| t.label.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();

        let mut output = String::from("=== Comparison ===\n");
        output.push_str(&format_table(&headers, &rows));

        output.push_str("\n--- Close correlation ---\n");
        let mut corr_headers = vec![String::new()];
        corr_headers.extend(correlation.symbols.iter().cloned());
        let corr_rows: Vec<Vec<String>> = correlation
            .symbols
            .iter()
            .zip(&correlation.values)
            .map(|(symbol, values)| {
                let mut row = vec![symbol.clone()];
                row.extend(values.iter().map(|v| {
                    v.map(|c| format!("{:.2}", c))
                        .unwrap_or_else(|| "n/a".to_string())
                }));
                row
            })
            .collect();
        output.push_str(&format_table(&corr_headers, &corr_rows));
        Ok(output)
    }
}
