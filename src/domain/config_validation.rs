//! Configuration validation.
//!
//! Runs before any data is touched; every failure here is a
//! configuration-class fault and aborts the invocation.

use chrono::NaiveDate;

use crate::domain::error::TrendsigError;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TrendsigError> {
    validate_initial_cash(config)?;
    validate_commission_rate(config)?;
    validate_dates(config)?;
    validate_symbols(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TrendsigError> {
    validate_rules_present(config)?;
    validate_indicator_params(config)?;
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), TrendsigError> {
    let value = config.get_double("backtest", "initial_cash", 0.0);
    if value <= 0.0 {
        return Err(TrendsigError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_commission_rate(config: &dyn ConfigPort) -> Result<(), TrendsigError> {
    let value = config.get_double("backtest", "commission_rate", 0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(TrendsigError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "commission_rate".to_string(),
            reason: "commission_rate must be in [0, 1)".to_string(),
        });
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TrendsigError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;
    if start >= end {
        return Err(TrendsigError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, TrendsigError> {
    match config.get_string("backtest", key) {
        None => Err(TrendsigError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| TrendsigError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", key),
            })
        }
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), TrendsigError> {
    match config.get_string("backtest", "symbols") {
        Some(s) if !s.trim().is_empty() => parse_symbols(&s).map(|_| ()),
        _ => Err(TrendsigError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbols".to_string(),
        }),
    }
}

/// Split a comma-separated symbol list, upper-cased, rejecting empty
/// tokens and duplicates.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, TrendsigError> {
    let mut symbols: Vec<String> = Vec::new();

    for token in input.split(',') {
        let symbol = token.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(TrendsigError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "symbols".to_string(),
                reason: "empty token in symbol list".to_string(),
            });
        }
        if symbols.contains(&symbol) {
            return Err(TrendsigError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "symbols".to_string(),
                reason: format!("duplicate symbol: {}", symbol),
            });
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

fn validate_rules_present(config: &dyn ConfigPort) -> Result<(), TrendsigError> {
    for key in ["buy_rule", "sell_rule"] {
        match config.get_string("strategy", key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(TrendsigError::ConfigMissing {
                    section: "strategy".to_string(),
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_indicator_params(config: &dyn ConfigPort) -> Result<(), TrendsigError> {
    for key in [
        "rsi_window",
        "ma_short",
        "ma_long",
        "macd_fast",
        "macd_slow",
        "macd_signal",
    ] {
        let value = config.get_int("indicators", key, 1);
        if value < 1 {
            return Err(TrendsigError::ConfigInvalid {
                section: "indicators".to_string(),
                key: key.to_string(),
                reason: format!("{} must be at least 1", key),
            });
        }
    }

    let fast = config.get_int("indicators", "macd_fast", 12);
    let slow = config.get_int("indicators", "macd_slow", 26);
    if fast >= slow {
        return Err(TrendsigError::ConfigInvalid {
            section: "indicators".to_string(),
            key: "macd_fast".to_string(),
            reason: "macd_fast must be smaller than macd_slow".to_string(),
        });
    }

    Ok(())
}
