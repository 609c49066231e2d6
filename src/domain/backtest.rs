//! Backtest runner: one single-pass simulation per instrument.
//!
//! Indicators are computed once up front; each bar is then classified and
//! fed to the execution simulator in timestamp order. Indicator values for
//! bar t depend only on bars 0..=t, so truncating the series reproduces the
//! prefix of the signal stream exactly (no look-ahead).

use crate::domain::error::TrendsigError;
use crate::domain::execution::apply_signal;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::ohlcv::{validate_series, PriceBar};
use crate::domain::portfolio::{Portfolio, Trade};
use crate::domain::signal::{classify_bar, SignalEvent};
use crate::domain::strategy::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_cash: f64,
    pub commission_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_cash: 10_000.0,
            commission_rate: 0.001,
        }
    }
}

/// Outcome of one run. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub symbol: String,
    pub final_value: f64,
    pub return_pct: f64,
    pub trades: Vec<Trade>,
    pub signals: Vec<SignalEvent>,
}

/// Run one instrument through indicators, rule evaluation, and execution.
pub fn run_backtest(
    symbol: &str,
    bars: &[PriceBar],
    strategy: &Strategy,
    config: &BacktestConfig,
) -> Result<BacktestResult, TrendsigError> {
    if bars.is_empty() {
        return Err(TrendsigError::NoData {
            symbol: symbol.to_string(),
        });
    }
    validate_series(symbol, bars)?;

    let frame = IndicatorFrame::compute(bars, &strategy.indicators);
    let mut portfolio = Portfolio::new(config.initial_cash, config.commission_rate);
    let mut signals = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let signal = classify_bar(
            &strategy.buy_rule,
            &strategy.sell_rule,
            &frame,
            i,
            portfolio.is_long(),
        );
        signals.push(SignalEvent {
            date: bar.date,
            signal,
        });
        apply_signal(&mut portfolio, signal, symbol, bar.date, bar.close)?;
    }

    let last_close = bars[bars.len() - 1].close;
    let final_value = portfolio.value(last_close);
    let return_pct = (final_value - config.initial_cash) / config.initial_cash * 100.0;

    Ok(BacktestResult {
        symbol: symbol.to_string(),
        final_value,
        return_pct,
        trades: portfolio.trades,
        signals,
    })
}
