//! End-to-end analytics scenarios over in-memory series.
//!
//! Tests cover:
//! - Constant, rising and too-short price series
//! - Sortino with a single losing day
//! - Batch analysis independent of input order
//! - Forecast refusal on short history
//! - Loading through a DataPort

mod common;

use approx::assert_relative_eq;
use assetlens::domain::analysis::{analyze, analyze_batch};
use assetlens::domain::config::AnalyticsConfig;
use assetlens::domain::error::{AnalyticsError, MetricError};
use assetlens::domain::indicator::{calculate_rsi, calculate_sma, IndicatorType};
use assetlens::domain::metrics::{max_drawdown, sortino_ratio, RiskSummary};
use assetlens::domain::returns::{daily_returns, valid_returns};
use assetlens::domain::trend::{classify_trend, TrendLabel};
use assetlens::ports::data_port::{DataPort, DateRange};
use common::*;

mod constant_series {
    use super::*;

    #[test]
    fn risk_metrics_for_flat_prices() {
        let bars = bars_from_closes(&[100.0; 40]);
        let risk = RiskSummary::compute(&bars, &AnalyticsConfig::default());

        assert_eq!(risk.observations, 39);
        assert_eq!(risk.volatility, Ok(0.0));
        assert!(matches!(
            risk.sharpe_ratio,
            Err(MetricError::DegenerateMetric { .. })
        ));
        assert_eq!(risk.max_drawdown, Ok(0.0));
    }

    #[test]
    fn rsi_resolves_zero_loss_to_100() {
        let bars = bars_from_closes(&[100.0; 40]);
        let rsi = calculate_rsi(&bars, 14);

        assert!(rsi.values[..14].iter().all(|p| !p.is_defined()));
        assert!(rsi.values[14..].iter().all(|p| p.simple() == Some(100.0)));
    }

    #[test]
    fn drawdown_never_leaves_zero() {
        let report = max_drawdown(&bars_from_closes(&[100.0; 40])).unwrap();
        assert_eq!(report.max_drawdown, 0.0);
        assert_eq!(report.peak_date, None);
        assert_eq!(report.longest_underwater, 0);
        assert!(report.points.iter().all(|p| p.drawdown == 0.0));
    }
}

mod rising_series {
    use super::*;

    fn rising() -> Vec<OhlcvBar> {
        let closes: Vec<f64> = (100..140).map(f64::from).collect();
        bars_from_closes(&closes)
    }

    #[test]
    fn sma_at_last_index_is_mean_of_last_twenty() {
        let sma = calculate_sma(&rising(), 20);
        let expected = (120..140).map(f64::from).sum::<f64>() / 20.0;

        assert_relative_eq!(sma.latest().unwrap().simple().unwrap(), expected);
        assert_relative_eq!(expected, 129.5);
    }

    #[test]
    fn no_drawdown() {
        assert_eq!(max_drawdown(&rising()).unwrap().max_drawdown, 0.0);
    }

    #[test]
    fn last_day_is_uptrend() {
        let trend = classify_trend(&rising(), &AnalyticsConfig::default());
        let last = trend.last().unwrap();

        assert_relative_eq!(last.pct_deviation.unwrap(), 9.5 / 129.5 * 100.0, epsilon = 1e-9);
        assert_eq!(last.label, TrendLabel::Uptrend);
        assert!(trend[..19].iter().all(|p| p.label == TrendLabel::Stable));
    }
}

mod short_series {
    use super::*;

    #[test]
    fn window_longer_than_series_is_all_undefined() {
        let bars = generate_bars("2024-03-01", 10, 50.0);
        let sma = calculate_sma(&bars, 20);

        assert_eq!(sma.len(), 10);
        assert_eq!(sma.defined_count(), 0);
    }

    #[test]
    fn analysis_still_completes() {
        let series = PriceSeries::new("TEN", generate_bars("2024-03-01", 10, 50.0)).unwrap();
        let analysis = analyze(&series, &AnalyticsConfig::default());

        let sma = analysis.indicator(&IndicatorType::Sma(20)).unwrap();
        assert_eq!(sma.defined_count(), 0);
        assert!(analysis.risk.volatility.is_ok());
        assert!(matches!(
            analysis.forecast,
            Err(MetricError::InsufficientHistory {
                required: 60,
                available: 10
            })
        ));
    }
}

#[test]
fn sortino_with_one_losing_day_is_undefined() {
    let bars = bars_from_closes(&[100.0, 101.0, 102.0, 101.0, 102.0, 103.0, 104.0]);
    let returns = valid_returns(&daily_returns(&bars));
    assert_eq!(returns.iter().filter(|r| **r < 0.0).count(), 1);

    match sortino_ratio(&returns, 0.02, 252.0) {
        Err(MetricError::DegenerateMetric { metric, reason }) => {
            assert_eq!(metric, "sortino_ratio");
            assert!(reason.contains("1 negative returns"));
        }
        other => panic!("expected DegenerateMetric, got {:?}", other),
    }
}

#[test]
fn batch_result_ignores_input_order() {
    let config = AnalyticsConfig::default();
    let a = series_from_closes("BTC", &[100.0, 105.0, 98.0, 110.0, 120.0]);
    let b = series_from_closes("GOLD", &[50.0, 50.5, 51.0, 50.8, 51.2]);
    let c = series_from_closes("SP500", &[400.0, 390.0, 395.0, 405.0, 401.0]);

    let forward = analyze_batch(&[a.clone(), b.clone(), c.clone()], &config);
    let shuffled = analyze_batch(&[c, a, b], &config);

    assert_eq!(forward, shuffled);
    assert_eq!(
        forward.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["BTC", "GOLD", "SP500"]
    );
}

#[test]
fn forecast_needs_sixty_observations() {
    let config = AnalyticsConfig::default();

    let short = PriceSeries::new("S", generate_bars("2023-01-01", 59, 100.0)).unwrap();
    assert!(analyze(&short, &config).forecast.is_err());

    let enough = PriceSeries::new("S", generate_bars("2023-01-01", 60, 100.0)).unwrap();
    let forecast = analyze(&enough, &config).forecast.unwrap();
    assert_eq!(forecast.projected().count(), 30);
    assert_eq!(forecast.fitted().count(), 60);
}

mod data_port {
    use super::*;

    #[test]
    fn mock_port_filters_range() {
        let port = MockDataPort::new().with_bars("BTC", generate_bars("2024-01-01", 30, 100.0));
        let range = DateRange {
            start: Some(date(2024, 1, 11)),
            end: Some(date(2024, 1, 20)),
        };

        let series = port.fetch_series("BTC", range).unwrap();
        assert_eq!(series.len(), 10);
        assert_eq!(series.first_date(), Some(date(2024, 1, 11)));
    }

    #[test]
    fn source_errors_surface_with_exit_status_three() {
        let port = MockDataPort::new().with_error("BAD", "connection reset");
        let err = port.fetch_series("BAD", DateRange::all()).unwrap_err();

        assert!(matches!(err, AnalyticsError::DataSource { .. }));
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn unordered_bars_are_rejected() {
        let bars = vec![make_bar("2024-01-02", 10.0), make_bar("2024-01-01", 11.0)];
        let port = MockDataPort::new().with_bars("X", bars);

        assert!(matches!(
            port.fetch_series("X", DateRange::all()),
            Err(AnalyticsError::UnorderedSeries { .. })
        ));
    }
}
