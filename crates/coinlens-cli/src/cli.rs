//! CLI argument definitions for coinlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dashboard` | Full dashboard: spot metrics, statistics, indicators, forecast |
//! | `indicators` | Moving averages, RSI and Mayer Multiple for one asset |
//! | `forecast` | Price projection with uncertainty bounds |
//! | `summary` | Eight-section narrative of the dashboard |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--offline` | `false` | Use synthetic data instead of the network |
//! | `--timeout-ms` | config | Per-request timeout |
//! | `--config` | none | JSON config file |
//! | `--log-level` | `warn` | Diagnostics level on stderr |
//!
//! # Examples
//!
//! ```bash
//! coinlens dashboard --from 2024-01-01 --to 2024-06-30 --pretty
//! coinlens indicators --asset eth --tail 10 --format table
//! coinlens forecast --forecaster linear --horizon 14
//! coinlens summary --offline
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use coinlens_feeds::Asset;

/// Crypto price indicators, forecasts and market summary.
#[derive(Debug, Parser)]
#[command(
    name = "coinlens",
    author,
    version,
    about = "Crypto price indicators, forecasts and market summary"
)]
pub struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Serve deterministic synthetic data; no network access.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Request timeout in milliseconds; overrides the config file.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// JSON config file with `analytics` and `feeds` sections.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ForecasterChoice {
    /// Holt linear-trend exponential smoothing.
    Holt,
    /// Least-squares trend line.
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AssetArg {
    Btc,
    Eth,
}

impl From<AssetArg> for Asset {
    fn from(value: AssetArg) -> Self {
        match value {
            AssetArg::Btc => Self::Btc,
            AssetArg::Eth => Self::Eth,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assemble the full dashboard.
    Dashboard(DashboardArgs),
    /// Compute indicators for one asset.
    Indicators(IndicatorsArgs),
    /// Project prices past the last observed day.
    Forecast(ForecastArgs),
    /// Print the narrative market summary.
    Summary(SummaryArgs),
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// First day of the charted range (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<String>,

    /// Last day of the charted range (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<String>,

    #[arg(long, value_enum, default_value_t = ForecasterChoice::Holt)]
    pub forecaster: ForecasterChoice,

    /// Forecast horizon in days; overrides the config file.
    #[arg(long)]
    pub horizon: Option<usize>,
}

#[derive(Debug, Args)]
pub struct IndicatorsArgs {
    #[arg(long, value_enum, default_value_t = AssetArg::Btc)]
    pub asset: AssetArg,

    /// Only emit the last N rows.
    #[arg(long)]
    pub tail: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    #[arg(long, value_enum, default_value_t = ForecasterChoice::Holt)]
    pub forecaster: ForecasterChoice,

    #[arg(long)]
    pub horizon: Option<usize>,

    /// Include the fitted history, not just the future horizon.
    #[arg(long, default_value_t = false)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[arg(long, value_enum, default_value_t = ForecasterChoice::Holt)]
    pub forecaster: ForecasterChoice,
}
