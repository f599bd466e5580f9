//! rsibot CLI: one evaluation cycle, indicator inspection, config dump.
//!
//! Commands:
//! - `run`: fetch history, evaluate the RSI/SMA rule, alert and buy on a signal
//! - `indicators`: print the latest indicator points without dispatching
//! - `config`: print the effective configuration as TOML
//!
//! Credentials come from the environment (or flags), never from the config file.
//! Logs go to stderr so `--json` output on stdout stays machine-readable.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rsibot_core::signals::IndicatorPoint;
use rsibot_runner::{build_runner, BotConfig, Credentials, SourceKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rsibot", about = "rsibot: RSI/SMA momentum buy-signal bot", version)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that builds a runner.
#[derive(Args)]
struct Source {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long, env = "RSIBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured symbol.
    #[arg(long)]
    symbol: Option<String>,

    /// Override the history source.
    #[arg(long, value_parser = ["yahoo", "csv", "synthetic"])]
    source: Option<String>,

    /// Read history from this CSV file (implies --source csv).
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Last day of the history window (YYYY-MM-DD) for csv and synthetic sources.
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one fetch → evaluate → dispatch cycle.
    Run {
        #[command(flatten)]
        source: Source,

        /// Log the alert and order instead of sending them.
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Print the outcome as JSON instead of the response text.
        #[arg(long, default_value_t = false)]
        json: bool,

        #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
        telegram_token: Option<String>,

        #[arg(long, env = "CHAT_ID")]
        chat_id: Option<String>,

        #[arg(long, env = "ALPACA_API_KEY", hide_env_values = true)]
        alpaca_key: Option<String>,

        #[arg(long, env = "ALPACA_SECRET_KEY", hide_env_values = true)]
        alpaca_secret: Option<String>,
    },
    /// Print recent indicator points for the configured symbol.
    Indicators {
        #[command(flatten)]
        source: Source,

        /// Number of trailing points to print.
        #[arg(long, default_value_t = 10)]
        last: usize,
    },
    /// Print the effective configuration.
    Config {
        #[command(flatten)]
        source: Source,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Run {
            source,
            dry_run,
            json,
            telegram_token,
            chat_id,
            alpaca_key,
            alpaca_secret,
        } => {
            let creds = Credentials {
                telegram_token,
                telegram_chat_id: chat_id,
                alpaca_key_id: alpaca_key,
                alpaca_secret_key: alpaca_secret,
            };
            run_cycle(&source, &creds, dry_run, json)
        }
        Commands::Indicators { source, last } => run_indicators(&source, last),
        Commands::Config { source } => {
            let config = load_config(&source)?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(source: &Source) -> Result<BotConfig> {
    let mut config = match &source.config {
        Some(path) => BotConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BotConfig::default(),
    };

    if let Some(symbol) = &source.symbol {
        config.symbol = symbol.trim().to_uppercase();
    }
    if let Some(kind) = source.source.as_deref() {
        config.data.source = match kind {
            "yahoo" => SourceKind::Yahoo,
            "csv" => SourceKind::Csv,
            "synthetic" => SourceKind::Synthetic,
            other => bail!("unknown source '{other}'"),
        };
    }
    if let Some(path) = &source.csv {
        config.data.source = SourceKind::Csv;
        config.data.csv_path = Some(path.clone());
    }
    if let Some(as_of) = source.as_of {
        config.data.as_of = Some(as_of);
    }

    config.validate()?;
    tracing::debug!(symbol = %config.symbol, source = ?config.data.source, "config loaded");
    Ok(config)
}

fn run_cycle(source: &Source, creds: &Credentials, dry_run: bool, json: bool) -> Result<()> {
    let config = load_config(source)?;
    let runner = build_runner(&config, creds, dry_run)?;

    let outcome = runner.run_once(&config.symbol);
    let response = outcome.response();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
    } else {
        println!("{}", response.body);
    }

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_indicators(source: &Source, last: usize) -> Result<()> {
    let config = load_config(source)?;
    // Dispatch is never reached here, so the logging clients are enough.
    let runner = build_runner(&config, &Credentials::default(), true)?;
    let points = runner.indicators(&config.symbol)?;

    println!(
        "{} via {} ({} points)",
        config.symbol,
        runner.provider_name(),
        points.len()
    );
    println!(
        "{:<12} {:>10} {:>8} {:>10}",
        "date",
        "close",
        format!("rsi{}", config.indicators.rsi_period),
        format!("sma{}", config.indicators.sma_period)
    );
    let skip = points.len().saturating_sub(last);
    for point in &points[skip..] {
        print_point(point);
    }
    Ok(())
}

fn print_point(point: &IndicatorPoint) {
    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
    println!(
        "{:<12} {:>10.2} {:>8} {:>10}",
        point.date.to_string(),
        point.close,
        fmt(point.rsi),
        fmt(point.sma)
    );
}
