//! CSV file data adapter.
//!
//! One file per symbol, `<dir>/<SYMBOL>.csv`, with a header row. Columns are
//! found by name, case-insensitively: `Date` and `Close` are required,
//! `Open`/`High`/`Low` fall back to the close and `Volume` to zero. When no
//! column is named `Date`, an unnamed first column (a written-out index) is
//! used instead.

use crate::domain::error::{AnalyticsError, MetricError};
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::data_port::{DataPort, DateRange};
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, MetricError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let missing = |name: &str| MetricError::MissingColumn {
            column: name.to_string(),
        };

        let date = find("date")
            .or_else(|| headers.get(0).filter(|h| h.trim().is_empty()).map(|_| 0))
            .ok_or_else(|| missing("Date"))?;

        Ok(Columns {
            date,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            close: find("close").ok_or_else(|| missing("Close"))?,
            volume: find("volume"),
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, AnalyticsError> {
    // Timestamps such as "2024-01-15 00:00:00+00:00" keep only the day.
    let day = raw.trim().split([' ', 'T']).next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| AnalyticsError::DataSource {
        reason: format!("invalid date '{}': {}", raw, e),
    })
}

fn parse_price(record: &StringRecord, column: usize, name: &str) -> Result<f64, AnalyticsError> {
    let raw = record.get(column).unwrap_or_default().trim();
    raw.parse().map_err(|e| AnalyticsError::DataSource {
        reason: format!("invalid {} value '{}': {}", name, raw, e),
    })
}

fn parse_optional(
    record: &StringRecord,
    column: Option<usize>,
    name: &str,
    fallback: f64,
) -> Result<f64, AnalyticsError> {
    match column {
        Some(c) if !record.get(c).unwrap_or_default().trim().is_empty() => {
            parse_price(record, c, name)
        }
        _ => Ok(fallback),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, symbol: &str, range: DateRange) -> Result<PriceSeries, AnalyticsError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| AnalyticsError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| AnalyticsError::DataSource {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let columns = Columns::locate(headers)?;

        let mut bars = Vec::new();
        let mut skipped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| AnalyticsError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_raw = record.get(columns.date).unwrap_or_default();
            let Ok(date) = parse_date(date_raw) else {
                // provider files carry extra header rows (ticker lines and the like)
                skipped += 1;
                continue;
            };
            if !range.contains(date) {
                continue;
            }

            if record.get(columns.close).unwrap_or_default().trim().is_empty() {
                skipped += 1;
                continue;
            }
            let close = parse_price(&record, columns.close, "close")?;

            bars.push(OhlcvBar {
                date,
                open: parse_optional(&record, columns.open, "open", close)?,
                high: parse_optional(&record, columns.high, "high", close)?,
                low: parse_optional(&record, columns.low, "low", close)?,
                close,
                volume: parse_optional(&record, columns.volume, "volume", 0.0)?,
            });
        }

        if skipped > 0 {
            warn!(symbol, skipped, "skipped rows without a date or close");
        }
        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded series");

        bars.sort_by_key(|b| b.date);
        PriceSeries::new(symbol, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, AnalyticsError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| AnalyticsError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| AnalyticsError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
