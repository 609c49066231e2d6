//! Latest-bar signal scan with notification de-duplication.
//!
//! The scan classifies only the most recent bar of each symbol and routes
//! the outcome through the notification port. "No signal today" is sent at
//! most once per symbol per scan context: the flag lives in an explicit
//! `ScanState` owned by the caller, not in process-global state, and a
//! buy/sell notification resets it.

use std::collections::HashMap;

use log::warn;

use crate::domain::error::TrendsigError;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::ohlcv::{validate_series, PriceBar};
use crate::domain::signal::{classify_bar, Signal};
use crate::domain::strategy::Strategy;
use crate::ports::notify_port::NotifyPort;

/// Per-symbol "already notified no-signal" flags, scoped to one scan
/// context (typically one batch invocation or one long-running session).
#[derive(Debug, Default)]
pub struct ScanState {
    notified_no_signal: HashMap<String, bool>,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    fn already_notified(&self, symbol: &str) -> bool {
        self.notified_no_signal.get(symbol).copied().unwrap_or(false)
    }

    fn set_notified(&mut self, symbol: &str, value: bool) {
        self.notified_no_signal.insert(symbol.to_string(), value);
    }
}

/// Classify the latest bar of one symbol and notify. The scanner holds no
/// position, so when buy and sell both fire, Buy is reported.
///
/// Notification failures are logged and swallowed; they never fail the
/// scan or leak into other symbols.
pub fn scan_symbol(
    symbol: &str,
    bars: &[PriceBar],
    strategy: &Strategy,
    state: &mut ScanState,
    notifier: &dyn NotifyPort,
) -> Result<Signal, TrendsigError> {
    if bars.is_empty() {
        return Err(TrendsigError::NoData {
            symbol: symbol.to_string(),
        });
    }
    validate_series(symbol, bars)?;

    let frame = IndicatorFrame::compute(bars, &strategy.indicators);
    let last = bars.len() - 1;
    let signal = classify_bar(&strategy.buy_rule, &strategy.sell_rule, &frame, last, false);

    match signal {
        Signal::Buy => {
            notify(notifier, &format!("{} - buy signal on {}", symbol, bars[last].date));
            state.set_notified(symbol, false);
        }
        Signal::Sell => {
            notify(
                notifier,
                &format!("{} - sell signal on {}", symbol, bars[last].date),
            );
            state.set_notified(symbol, false);
        }
        Signal::Hold => {
            if !state.already_notified(symbol) {
                notify(notifier, &format!("{}: no buy/sell signal today", symbol));
                state.set_notified(symbol, true);
            }
        }
    }

    Ok(signal)
}

fn notify(notifier: &dyn NotifyPort, text: &str) {
    if let Err(e) = notifier.notify(text) {
        warn!("notification dropped: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{IndicatorField, IndicatorParams};
    use crate::domain::rule::{Operand, Rule};
    use chrono::NaiveDate;
    use std::cell::RefCell;

    struct RecordingNotifier {
        sent: RefCell<Vec<String>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            RecordingNotifier {
                sent: RefCell::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
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
                    reason: "unreachable".into(),
                });
            }
            self.sent.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                symbol: "TSLA".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000.0,
            })
            .collect()
    }

    fn short_strategy() -> Strategy {
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
                ma_short: 2,
                ma_long: 4,
                macd_fast: 2,
                macd_slow: 4,
                macd_signal: 2,
            },
        }
    }

    #[test]
    fn buy_signal_notifies_with_symbol_and_date() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 110.0]);
        let notifier = RecordingNotifier::new();
        let mut state = ScanState::new();

        let signal =
            scan_symbol("TSLA", &bars, &short_strategy(), &mut state, &notifier).unwrap();

        assert_eq!(signal, Signal::Buy);
        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("TSLA - buy signal on 2024-01-06"));
    }

    #[test]
    fn no_signal_notified_once_across_repeated_scans() {
        let bars = make_bars(&[100.0; 10]);
        let notifier = RecordingNotifier::new();
        let mut state = ScanState::new();

        for _ in 0..3 {
            let signal =
                scan_symbol("TSLA", &bars, &short_strategy(), &mut state, &notifier).unwrap();
            assert_eq!(signal, Signal::Hold);
        }

        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], "TSLA: no buy/sell signal today");
    }

    #[test]
    fn no_signal_flag_is_per_symbol() {
        let bars = make_bars(&[100.0; 10]);
        let notifier = RecordingNotifier::new();
        let mut state = ScanState::new();

        scan_symbol("TSLA", &bars, &short_strategy(), &mut state, &notifier).unwrap();
        scan_symbol("PLTR", &bars, &short_strategy(), &mut state, &notifier).unwrap();

        assert_eq!(notifier.sent.borrow().len(), 2);
    }

    #[test]
    fn signal_resets_no_signal_flag() {
        let flat = make_bars(&[100.0; 10]);
        let rising = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 110.0]);
        let notifier = RecordingNotifier::new();
        let mut state = ScanState::new();

        scan_symbol("TSLA", &flat, &short_strategy(), &mut state, &notifier).unwrap();
        scan_symbol("TSLA", &rising, &short_strategy(), &mut state, &notifier).unwrap();
        scan_symbol("TSLA", &flat, &short_strategy(), &mut state, &notifier).unwrap();

        let sent = notifier.sent.borrow();
        // no-signal, buy, no-signal again after the reset
        assert_eq!(sent.len(), 3);
        assert!(sent[0].contains("no buy/sell"));
        assert!(sent[1].contains("buy signal"));
        assert!(sent[2].contains("no buy/sell"));
    }

    #[test]
    fn notifier_failure_is_swallowed() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 110.0]);
        let notifier = RecordingNotifier::failing();
        let mut state = ScanState::new();

        let signal =
            scan_symbol("TSLA", &bars, &short_strategy(), &mut state, &notifier).unwrap();
        assert_eq!(signal, Signal::Buy);
    }

    #[test]
    fn empty_series_is_no_data() {
        let notifier = RecordingNotifier::new();
        let mut state = ScanState::new();
        let err = scan_symbol("TSLA", &[], &short_strategy(), &mut state, &notifier);
        assert!(matches!(err, Err(TrendsigError::NoData { .. })));
    }
}
