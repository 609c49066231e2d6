//! Order execution state machine.
//!
//! Two states per instrument: Flat (size 0) and Long (size > 0).
//! Sizing is all-in: a buy commits `floor(cash / close)` whole shares, a
//! sell liquidates the entire position. Duplicate or contradictory signals
//! (Buy while Long, Sell while Flat) are no-ops. Commission is
//! `size * close * rate` on either side.
//!
//! A non-positive or non-finite close is a precondition violation and
//! fails the run; the sizing arithmetic assumes strictly positive prices.

use chrono::NaiveDate;

use crate::domain::error::TrendsigError;
use crate::domain::portfolio::{Portfolio, Trade, TradeSide};
use crate::domain::signal::Signal;

/// Feed one signal into the portfolio. Returns the executed trade, if any.
pub fn apply_signal(
    portfolio: &mut Portfolio,
    signal: Signal,
    symbol: &str,
    date: NaiveDate,
    close: f64,
) -> Result<Option<Trade>, TrendsigError> {
    if !(close > 0.0) || !close.is_finite() {
        return Err(TrendsigError::InvalidPrice {
            symbol: symbol.to_string(),
            date,
            price: close,
        });
    }

    let trade = match signal {
        Signal::Buy if !portfolio.is_long() => execute_buy(portfolio, date, close),
        Signal::Sell if portfolio.is_long() => Some(execute_sell(portfolio, date, close)),
        _ => None,
    };

    Ok(trade)
}

fn execute_buy(portfolio: &mut Portfolio, date: NaiveDate, close: f64) -> Option<Trade> {
    let rate = portfolio.commission_rate;
    let gross = close * (1.0 + rate);
    let mut size = (portfolio.cash / close).floor() as u64;

    // the commission comes out of the same cash; shrink the order if the
    // all-in debit would overdraw
    if size as f64 * gross > portfolio.cash {
        size = (portfolio.cash / gross).floor() as u64;
        while size > 0 && size as f64 * gross > portfolio.cash {
            size -= 1;
        }
    }

    if size == 0 {
        return None;
    }

    let notional = size as f64 * close;
    let commission = notional * rate;
    portfolio.cash -= size as f64 * gross;
    portfolio.position.size = size;

    let trade = Trade {
        date,
        side: TradeSide::Buy,
        price: close,
        size,
        commission,
    };
    portfolio.record_trade(trade.clone());
    Some(trade)
}

fn execute_sell(portfolio: &mut Portfolio, date: NaiveDate, close: f64) -> Trade {
    let size = portfolio.position.size;
    let notional = size as f64 * close;
    let commission = notional * portfolio.commission_rate;

    portfolio.cash += notional - commission;
    portfolio.position.size = 0;

    let trade = Trade {
        date,
        side: TradeSide::Sell,
        price: close,
        size,
        commission,
    };
    portfolio.record_trade(trade.clone());
    trade
}
