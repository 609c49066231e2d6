//! Multi-instrument aggregation.
//!
//! Each symbol's run owns its portfolio and indicator frame outright, so
//! runs execute in parallel with no shared mutable state. A symbol that
//! fails to produce data is skipped with a warning; the rest of the batch
//! is unaffected.

use chrono::NaiveDate;
use log::warn;
use rayon::prelude::*;

use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::strategy::Strategy;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

/// Per-symbol results plus the symbols that produced none.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub results: Vec<BacktestResult>,
    pub skipped: Vec<SkippedSymbol>,
}

impl BatchResult {
    pub fn get(&self, symbol: &str) -> Option<&BacktestResult> {
        self.results.iter().find(|r| r.symbol == symbol)
    }
}

/// Backtest every symbol independently. Results come back ordered by
/// symbol regardless of which run finished first.
pub fn run_all(
    data_port: &(dyn DataPort + Sync),
    symbols: &[String],
    strategy: &Strategy,
    config: &BacktestConfig,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> BatchResult {
    let outcomes: Vec<Result<BacktestResult, SkippedSymbol>> = symbols
        .par_iter()
        .map(|symbol| {
            let bars = match data_port.fetch(symbol, start_date, end_date) {
                Ok(bars) => bars,
                Err(e) => {
                    warn!("skipping {}: {}", symbol, e);
                    return Err(SkippedSymbol {
                        symbol: symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            };

            run_backtest(symbol, &bars, strategy, config).map_err(|e| {
                warn!("skipping {}: {}", symbol, e);
                SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                }
            })
        })
        .collect();

    let mut results = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(skip) => skipped.push(skip),
        }
    }
    results.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    skipped.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    BatchResult { results, skipped }
}
