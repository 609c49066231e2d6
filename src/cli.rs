//! CLI definition and dispatch.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::adapters::console_notifier::ConsoleNotifier;
use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::backtest::BacktestConfig;
use crate::domain::batch::{self, BatchResult};
use crate::domain::config_validation::{
    parse_symbols, validate_backtest_config, validate_strategy_config,
};
use crate::domain::error::TrendsigError;
use crate::domain::indicator::{IndicatorFrame, IndicatorParams};
use crate::domain::rule_parser;
use crate::domain::scan::{scan_symbol, ScanState};
use crate::domain::strategy::Strategy;
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "trendsig", about = "Rule-based trading signal and backtesting engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest the configured strategy over every configured symbol
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Run a single symbol instead of the configured list
        #[arg(long)]
        symbol: Option<String>,
        /// Directory for per-symbol SVG charts (overrides [report] chart_dir)
        #[arg(long)]
        charts: Option<PathBuf>,
        /// Parse and echo the configuration without touching data
        #[arg(long)]
        dry_run: bool,
    },
    /// Evaluate the latest bar of each symbol and send notifications
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            charts,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest_cmd(&config, symbol.as_deref(), charts)
            }
        }
        Command::Scan { config, symbol } => run_scan(&config, symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TrendsigError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Backtest window plus portfolio parameters from the [backtest] section.
pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
) -> Result<(BacktestConfig, NaiveDate, NaiveDate), TrendsigError> {
    let parse_date = |key: &str| -> Result<NaiveDate, TrendsigError> {
        let value = adapter.get_string("backtest", key).ok_or_else(|| {
            TrendsigError::ConfigMissing {
                section: "backtest".into(),
                key: key.into(),
            }
        })?;
        NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| TrendsigError::ConfigInvalid {
            section: "backtest".into(),
            key: key.into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        })
    };

    let config = BacktestConfig {
        initial_cash: adapter.get_double("backtest", "initial_cash", 10_000.0),
        commission_rate: adapter.get_double("backtest", "commission_rate", 0.001),
    };
    Ok((config, parse_date("start_date")?, parse_date("end_date")?))
}

pub fn build_strategy(adapter: &dyn ConfigPort) -> Result<Strategy, ExitCode> {
    let name = adapter
        .get_string("strategy", "name")
        .unwrap_or_else(|| "Unnamed".to_string());
    let description = adapter
        .get_string("strategy", "description")
        .unwrap_or_default();

    let parse_rule = |key: &str| {
        let input = adapter.get_string("strategy", key).unwrap_or_default();
        rule_parser::parse(&input).map_err(|e| {
            eprintln!(
                "error: failed to parse {}:\n{}",
                key,
                e.display_with_context(&input)
            );
            ExitCode::from(4)
        })
    };

    let buy_rule = parse_rule("buy_rule")?;
    let sell_rule = parse_rule("sell_rule")?;

    let defaults = IndicatorParams::default();
    let get = |key: &str, default: usize| {
        adapter.get_int("indicators", key, default as i64).max(0) as usize
    };

    Ok(Strategy {
        name,
        description,
        buy_rule,
        sell_rule,
        indicators: IndicatorParams {
            rsi_window: get("rsi_window", defaults.rsi_window),
            ma_short: get("ma_short", defaults.ma_short),
            ma_long: get("ma_long", defaults.ma_long),
            macd_fast: get("macd_fast", defaults.macd_fast),
            macd_slow: get("macd_slow", defaults.macd_slow),
            macd_signal: get("macd_signal", defaults.macd_signal),
        },
    })
}

pub fn resolve_symbols(
    symbol_override: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<Vec<String>, TrendsigError> {
    if let Some(symbol) = symbol_override {
        return Ok(vec![symbol.to_uppercase()]);
    }
    let symbols = adapter.get_string("backtest", "symbols").ok_or_else(|| {
        TrendsigError::ConfigMissing {
            section: "backtest".into(),
            key: "symbols".into(),
        }
    })?;
    parse_symbols(&symbols)
}

fn data_adapter(adapter: &dyn ConfigPort) -> CsvDataAdapter {
    let dir = adapter
        .get_string("backtest", "data_dir")
        .unwrap_or_else(|| "./data".to_string());
    CsvDataAdapter::new(PathBuf::from(dir))
}

fn run_backtest_cmd(
    config_path: &PathBuf,
    symbol_override: Option<&str>,
    charts_override: Option<PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };
    eprintln!("Loading strategy: {}", strategy.name);

    let (bt_config, start_date, end_date) = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match resolve_symbols(symbol_override, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = data_adapter(&adapter);

    eprintln!(
        "Running backtest: {} symbols, {} to {}",
        symbols.len(),
        start_date,
        end_date,
    );

    let batch = batch::run_all(
        &data_port,
        &symbols,
        &strategy,
        &bt_config,
        start_date,
        end_date,
    );

    for skip in &batch.skipped {
        eprintln!("warning: skipped {} ({})", skip.symbol, skip.reason);
    }

    if batch.results.is_empty() {
        eprintln!("error: no symbol produced a result");
        return ExitCode::from(5);
    }

    print_summary(&batch, bt_config.initial_cash);

    let chart_dir = charts_override
        .or_else(|| adapter.get_string("report", "chart_dir").map(PathBuf::from));
    if let Some(dir) = chart_dir {
        render_charts(&batch, &data_port, &strategy, start_date, end_date, &dir);
    }

    ExitCode::SUCCESS
}

fn print_summary(batch: &BatchResult, initial_cash: f64) {
    eprintln!("\n=== Results ===");
    eprintln!("Initial cash:     {:.2}", initial_cash);
    for result in &batch.results {
        eprintln!(
            "  {:<8} final {:>12.2}  return {:>8.2}%  trades {:>3}",
            result.symbol,
            result.final_value,
            result.return_pct,
            result.trades.len(),
        );
    }
}

/// One chart per successful symbol. A failed render is logged and skipped;
/// it must not suppress the remaining charts.
fn render_charts(
    batch: &BatchResult,
    data_port: &dyn DataPort,
    strategy: &Strategy,
    start_date: NaiveDate,
    end_date: NaiveDate,
    dir: &PathBuf,
) {
    if let Err(e) = fs::create_dir_all(dir) {
        warn!("cannot create chart directory {}: {}", dir.display(), e);
        return;
    }

    let chart = SvgChartAdapter::new();
    for result in &batch.results {
        let bars = match data_port.fetch(&result.symbol, start_date, end_date) {
            Ok(bars) => bars,
            Err(e) => {
                warn!("no chart for {}: {}", result.symbol, e);
                continue;
            }
        };
        let frame = IndicatorFrame::compute(&bars, &strategy.indicators);
        let path = dir.join(format!("{}.svg", result.symbol));
        match chart.render(&result.symbol, &bars, &frame, &result.signals, &path) {
            Ok(()) => info!("chart written to {}", path.display()),
            Err(e) => warn!("no chart for {}: {}", result.symbol, e),
        }
    }
}

fn run_scan(config_path: &PathBuf, symbol_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let (_, start_date, end_date) = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match resolve_symbols(symbol_override, &adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = data_adapter(&adapter);
    let notifier = ConsoleNotifier::new();
    let mut state = ScanState::new();
    let mut scanned = 0usize;

    for symbol in &symbols {
        let bars = match data_port.fetch(symbol, start_date, end_date) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("warning: skipped {} ({})", symbol, e);
                continue;
            }
        };
        match scan_symbol(symbol, &bars, &strategy, &mut state, &notifier) {
            Ok(signal) => {
                info!("{}: {}", symbol, signal);
                scanned += 1;
            }
            Err(e) => eprintln!("warning: skipped {} ({})", symbol, e),
        }
    }

    if scanned == 0 {
        eprintln!("error: no symbol could be scanned");
        return ExitCode::from(5);
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    for key in ["buy_rule", "sell_rule"] {
        let input = adapter.get_string("strategy", key).unwrap_or_default();
        match rule_parser::parse(&input) {
            Ok(rule) => {
                eprintln!("\n{}:", key);
                eprintln!("  Parsed: {}", rule);
                eprintln!("  Raw:    {}", input);
            }
            Err(e) => {
                eprintln!("error: {}", e.display_with_context(&input));
                return (&TrendsigError::from(e)).into();
            }
        }
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(code) => return code,
    };

    eprintln!("\nStrategy rules (parsed):");
    eprintln!("  buy_rule:  {}", strategy.buy_rule);
    eprintln!("  sell_rule: {}", strategy.sell_rule);

    let mut fields = strategy.buy_rule.referenced_fields();
    for field in strategy.sell_rule.referenced_fields() {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    eprintln!("\nIndicator columns used:");
    for field in &fields {
        eprintln!("  {}", field);
    }

    match resolve_symbols(None, &adapter) {
        Ok(symbols) => eprintln!("\nSymbols: {}", symbols.join(", ")),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = data_adapter(&adapter);
    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in data directory");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
