//! Pairwise correlation of close prices across symbols.

use crate::domain::ohlcv::PriceSeries;
use crate::domain::stats;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    /// Row-major, `values[i][j]` pairs `symbols[i]` with `symbols[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.symbols.iter().position(|s| s == a)?;
        let j = self.symbols.iter().position(|s| s == b)?;
        self.values[i][j]
    }
}

/// Pearson correlation of closes over the dates each pair shares.
///
/// A pair with fewer than two shared dates, or with a constant close on
/// either side, has no correlation.
pub fn correlation_matrix(series: &[PriceSeries]) -> CorrelationMatrix {
    let closes: Vec<HashMap<NaiveDate, f64>> = series
        .iter()
        .map(|s| s.bars().iter().map(|b| (b.date, b.close)).collect())
        .collect();

    let n = series.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let corr = if i == j {
                let own = series[i].closes();
                stats::correlation(&own, &own).map(|_| 1.0)
            } else {
                pair_correlation(&series[i], &closes[j])
            };
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }

    CorrelationMatrix {
        symbols: series.iter().map(|s| s.symbol().to_string()).collect(),
        values,
    }
}

fn pair_correlation(left: &PriceSeries, right: &HashMap<NaiveDate, f64>) -> Option<f64> {
    let (x, y): (Vec<f64>, Vec<f64>) = left
        .bars()
        .iter()
        .filter_map(|b| right.get(&b.date).map(|&r| (b.close, r)))
        .unzip();
    stats::correlation(&x, &y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use approx::assert_relative_eq;
    use chrono::Duration;

    fn series(symbol: &str, start_offset: i64, prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &c)| OhlcvBar::flat(start + Duration::days(start_offset + i as i64), c))
            .collect();
        PriceSeries::new(symbol, bars).unwrap()
    }

    #[test]
    fn perfectly_correlated_and_anti_correlated() {
        let a = series("A", 0, &[1.0, 2.0, 3.0, 4.0]);
        let b = series("B", 0, &[10.0, 20.0, 30.0, 40.0]);
        let c = series("C", 0, &[4.0, 3.0, 2.0, 1.0]);
        let matrix = correlation_matrix(&[a, b, c]);

        assert_relative_eq!(matrix.get("A", "B").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(matrix.get("A", "C").unwrap(), -1.0, epsilon = 1e-12);
        assert_eq!(matrix.get("B", "B"), Some(1.0));
        assert_eq!(matrix.get("A", "B"), matrix.get("B", "A"));
    }

    #[test]
    fn aligns_on_shared_dates() {
        // B starts two days later; shared closes are A[2..] and B[..2]
        let a = series("A", 0, &[5.0, 1.0, 1.0, 2.0]);
        let b = series("B", 2, &[3.0, 6.0, 100.0]);
        let matrix = correlation_matrix(&[a, b]);
        assert_relative_eq!(matrix.get("A", "B").unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn undefined_pairs() {
        let flat = series("FLAT", 0, &[5.0, 5.0, 5.0]);
        let moving = series("MOVE", 0, &[1.0, 2.0, 3.0]);
        let disjoint = series("LATE", 10, &[1.0, 2.0, 3.0]);
        let matrix = correlation_matrix(&[flat, moving, disjoint]);

        assert_eq!(matrix.get("FLAT", "FLAT"), None);
        assert_eq!(matrix.get("FLAT", "MOVE"), None);
        assert_eq!(matrix.get("MOVE", "LATE"), None);
        assert_eq!(matrix.get("MOVE", "UNKNOWN"), None);
    }
}
