//! Shared helpers for the integration suite.

// not every test binary uses every helper
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;

use trendsig::domain::error::TrendsigError;
use trendsig::domain::indicator::{IndicatorField, IndicatorParams};
use trendsig::domain::ohlcv::PriceBar;
use trendsig::domain::rule::{Operand, Rule};
use trendsig::domain::strategy::Strategy;
use trendsig::ports::data_port::DataPort;
use trendsig::ports::notify_port::NotifyPort;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Consecutive daily bars starting 2024-01-01 with the given closes.
pub fn make_bars(symbol: &str, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            symbol: symbol.into(),
            date: date(2024, 1, 1) + chrono::Days::new(i as u64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000.0,
        })
        .collect()
}

/// Deterministic choppy walk, strictly positive.
pub fn choppy_closes(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 100.0 + ((i * 37) % 23) as f64 - 11.0 + (i % 3) as f64)
        .collect()
}

/// MA crossover with short windows so tests need no 200-bar warm-up.
pub fn crossover_strategy(short: usize, long: usize) -> Strategy {
    let field = |f| Operand::Field(f);
    Strategy {
        name: "crossover".into(),
        description: String::new(),
        buy_rule: Rule::Above {
            left: field(IndicatorField::MaShort),
            right: field(IndicatorField::MaLong),
        },
        sell_rule: Rule::Below {
            left: field(IndicatorField::MaShort),
            right: field(IndicatorField::MaLong),
        },
        indicators: IndicatorParams {
            rsi_window: 2,
            ma_short: short,
            ma_long: long,
            macd_fast: 2,
            macd_slow: 4,
            macd_signal: 2,
        },
    }
}

/// A buy rule that fires from bar 0 (macd_signal is defined everywhere)
/// and a sell rule that never fires.
pub fn always_buy_strategy() -> Strategy {
    Strategy {
        name: "always-buy".into(),
        description: String::new(),
        buy_rule: Rule::Above {
            left: Operand::Field(IndicatorField::MacdSignal),
            right: Operand::Constant(-1.0e12),
        },
        sell_rule: Rule::Below {
            left: Operand::Field(IndicatorField::MacdSignal),
            right: Operand::Constant(-1.0e12),
        },
        indicators: IndicatorParams::default(),
    }
}

/// In-memory data port keyed by symbol.
pub struct MockDataPort {
    series: HashMap<String, Vec<PriceBar>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        MockDataPort {
            series: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.series.insert(symbol.to_string(), bars);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TrendsigError> {
        let bars = self
            .series
            .get(symbol)
            .ok_or_else(|| TrendsigError::NoData {
                symbol: symbol.to_string(),
            })?;
        Ok(bars
            .iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .cloned()
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TrendsigError> {
        let mut symbols: Vec<String> = self.series.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Notifier that records every message; optionally fails every call.
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        RecordingNotifier {
            sent: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        RecordingNotifier {
            sent: RefCell::new(Vec::new()),
            fail: true,
        }
    }
}

impl NotifyPort for RecordingNotifier {
    fn notify(&self, text: &str) -> Result<(), TrendsigError> {
        if self.fail {
            return Err(TrendsigError::Notify {
                reason: "delivery refused".into(),
            });
        }
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}
