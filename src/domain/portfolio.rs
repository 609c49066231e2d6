//! Cash-and-position portfolio state for a single instrument.

use std::fmt;

use chrono::NaiveDate;

/// Share count held. Zero means flat; there is no short state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// One executed order. Appended to the trade log and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub price: f64,
    pub size: u64,
    pub commission: f64,
}

/// Owned exclusively by one backtest run; created at run start, read out
/// once at run end.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_cash: f64,
    pub commission_rate: f64,
    pub position: Position,
    pub trades: Vec<Trade>,
}

impl Portfolio {
    pub fn new(initial_cash: f64, commission_rate: f64) -> Self {
        Portfolio {
            cash: initial_cash,
            initial_cash,
            commission_rate,
            position: Position { size: 0 },
            trades: Vec::new(),
        }
    }

    pub fn is_long(&self) -> bool {
        self.position.size > 0
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    /// Mark-to-market value: cash plus the position at the given price.
    pub fn value(&self, last_close: f64) -> f64 {
        self.cash + self.position.size as f64 * last_close
    }
}
