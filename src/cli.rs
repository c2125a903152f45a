//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report::JsonReport;
use crate::adapters::text_report::TextReport;
use crate::domain::analysis::{analyze, analyze_batch, compute_indicators};
use crate::domain::config::AnalyticsConfig;
use crate::domain::config_validation::{build_analytics_config, validate_analytics_config};
use crate::domain::correlation::correlation_matrix;
use crate::domain::error::AnalyticsError;
use crate::domain::forecast::forecast;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::metrics::{max_drawdown, RiskSummary};
use crate::domain::ohlcv::PriceSeries;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{DataPort, DateRange};
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(
    name = "assetlens",
    about = "Indicator, risk and forecast analytics for daily price series"
)]
pub struct Cli {
    #[command(flatten)]
    pub source: Source,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct Source {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding one `<SYMBOL>.csv` per series
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// First date to load (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub start: Option<NaiveDate>,
    /// Last date to load (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub end: Option<NaiveDate>,
    /// Emit JSON instead of text tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Full analysis of one symbol
    Analyze { symbol: String },
    /// Indicator values for the most recent observations
    Indicators {
        symbol: String,
        /// Number of trailing rows; 0 prints all
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// Risk metrics and drawdown
    Risk { symbol: String },
    /// Trend forecast with an 80% interval
    Forecast {
        symbol: String,
        /// Calendar days to project
        #[arg(long)]
        horizon: Option<usize>,
    },
    /// Side-by-side risk and close correlation for several symbols
    Compare {
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<String>,
    },
    /// List the symbols available in the data directory
    ListSymbols,
    /// Validate a configuration file
    Validate,
}

/// Everything a subcommand needs once config and data source are resolved.
struct Session {
    settings: FileConfigAdapter,
    config: AnalyticsConfig,
    data: CsvAdapter,
    range: DateRange,
    report: Box<dyn ReportPort>,
}

impl Session {
    fn open(source: &Source) -> Result<Self, AnalyticsError> {
        // Stage 1: Load config
        let settings = match &source.config {
            Some(path) => {
                info!(path = %path.display(), "loading config");
                FileConfigAdapter::from_file(path)?
            }
            None => FileConfigAdapter::empty(),
        };

        // Stage 2: Build and validate analytics parameters
        let config = build_analytics_config(&settings)?;

        // Stage 3: Resolve data source
        let data_dir = resolve_data_dir(source.data_dir.as_ref(), &settings);
        let range = DateRange {
            start: source.start,
            end: source.end,
        };
        if let (Some(start), Some(end)) = (range.start, range.end) {
            if start > end {
                return Err(AnalyticsError::ConfigInvalid {
                    section: "cli".into(),
                    key: "start".into(),
                    reason: format!("{} is after --end {}", start, end),
                });
            }
        }

        let report: Box<dyn ReportPort> = if source.json {
            Box::new(JsonReport)
        } else {
            Box::new(TextReport)
        };

        Ok(Session {
            settings,
            config,
            data: CsvAdapter::new(data_dir),
            range,
            report,
        })
    }

    fn fetch(&self, symbol: &str) -> Result<PriceSeries, AnalyticsError> {
        let series = self.data.fetch_series(symbol, self.range)?;
        if series.is_empty() {
            return Err(AnalyticsError::NoData {
                symbol: symbol.to_string(),
            });
        }
        info!(symbol, bars = series.len(), "loaded series");
        Ok(series)
    }
}

/// Data directory precedence: `--data-dir`, then `[data] directory`, then `data`.
pub fn resolve_data_dir(flag: Option<&PathBuf>, settings: &dyn ConfigPort) -> PathBuf {
    flag.cloned()
        .or_else(|| settings.get_string("data", "directory").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Symbols to compare: the flag, then `[data] symbols`, then every file found.
pub fn resolve_symbols(
    flag: &[String],
    settings: &dyn ConfigPort,
    data: &dyn DataPort,
) -> Result<Vec<String>, AnalyticsError> {
    let requested: Vec<String> = flag
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !requested.is_empty() {
        return Ok(requested);
    }
    let configured = settings.get_list("data", "symbols");
    if !configured.is_empty() {
        return Ok(configured);
    }
    data.list_symbols()
}

fn tail(series: Vec<IndicatorSeries>, rows: usize) -> Vec<IndicatorSeries> {
    if rows == 0 {
        return series;
    }
    series
        .into_iter()
        .map(|mut s| {
            let skip = s.values.len().saturating_sub(rows);
            s.values.drain(..skip);
            s
        })
        .collect()
}

/// Runs a command and returns the report text written to stdout.
pub fn execute(cli: &Cli) -> Result<String, AnalyticsError> {
    if let Command::Validate = cli.command {
        return run_validate(&cli.source);
    }

    let mut session = Session::open(&cli.source)?;

    match &cli.command {
        Command::Analyze { symbol } => {
            let series = session.fetch(symbol)?;
            session.report.analysis(&analyze(&series, &session.config))
        }
        Command::Indicators { symbol, tail: rows } => {
            let series = session.fetch(symbol)?;
            let indicators = compute_indicators(series.bars(), &session.config);
            session
                .report
                .indicators(series.symbol(), &tail(indicators, *rows))
        }
        Command::Risk { symbol } => {
            let series = session.fetch(symbol)?;
            let risk = RiskSummary::compute(series.bars(), &session.config);
            session
                .report
                .risk(series.symbol(), &risk, &max_drawdown(series.bars()))
        }
        Command::Forecast { symbol, horizon } => {
            if let Some(days) = horizon {
                session.config.forecast.horizon_days = *days;
                validate_analytics_config(&session.config)?;
            }
            let series = session.fetch(symbol)?;
            let projection = forecast(series.bars(), &session.config.forecast)?;
            session.report.forecast(series.symbol(), &projection)
        }
        Command::Compare { symbols } => run_compare(&session, symbols),
        Command::ListSymbols => Ok(session.data.list_symbols()?.join("\n")),
        Command::Validate => run_validate(&cli.source),
    }
}

fn run_compare(session: &Session, flag: &[String]) -> Result<String, AnalyticsError> {
    let symbols = resolve_symbols(flag, &session.settings, &session.data)?;

    let mut loaded = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        match session.fetch(symbol) {
            Ok(series) => loaded.push(series),
            Err(e) => warn!(symbol = symbol.as_str(), "skipping ({})", e),
        }
    }

    if loaded.is_empty() {
        return Err(AnalyticsError::NoData {
            symbol: symbols.join(","),
        });
    }

    info!(symbols = loaded.len(), "comparing");
    let analyses = analyze_batch(&loaded, &session.config);
    let matrix = correlation_matrix(&loaded);
    session.report.comparison(&analyses, &matrix)
}

fn run_validate(source: &Source) -> Result<String, AnalyticsError> {
    let path = source
        .config
        .as_ref()
        .ok_or_else(|| AnalyticsError::ConfigMissing {
            section: "cli".into(),
            key: "--config".into(),
        })?;

    let settings = FileConfigAdapter::from_file(path)?;
    let config = build_analytics_config(&settings)?;

    if source.json {
        return serde_json::to_string_pretty(&config).map_err(|e| AnalyticsError::Report {
            reason: format!("JSON serialization failed: {}", e),
        });
    }

    let mut output = format!("{}: configuration is valid\n", path.display());
    output.push_str(&format!(
        "  data directory:  {}\n",
        resolve_data_dir(source.data_dir.as_ref(), &settings).display()
    ));
    output.push_str(&format!(
        "  indicators:      SMA({}) RSI({}) MACD({},{},{}) BOLLINGER({},{}) VOLATILITY({})\n",
        config.window_sma,
        config.window_rsi,
        config.macd_fast,
        config.macd_slow,
        config.macd_signal,
        config.bollinger_window,
        config.bollinger_k,
        config.volatility_window
    ));
    output.push_str(&format!(
        "  risk:            rf {} confidence {} factor {}\n",
        config.risk_free_rate, config.var_confidence, config.annualization_factor
    ));
    output.push_str(&format!(
        "  forecast:        {} days, {} observations required\n",
        config.forecast.horizon_days,
        config.forecast.required_history()
    ));
    Ok(output)
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(&cli) {
        Ok(text) => {
            println!("{}", text.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}
