//! Technical indicator library.
//!
//! All indicator functions are pure: same input, same output, no shared
//! state across calls. Values for bars inside an indicator's warm-up period
//! are `None`, never a fabricated number.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use std::fmt;

use crate::domain::ohlcv::PriceBar;

/// The indicator columns a rule may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorField {
    Rsi,
    MaShort,
    MaLong,
    Macd,
    MacdSignal,
}

impl IndicatorField {
    pub const ALL: [IndicatorField; 5] = [
        IndicatorField::Rsi,
        IndicatorField::MaShort,
        IndicatorField::MaLong,
        IndicatorField::Macd,
        IndicatorField::MacdSignal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorField::Rsi => "rsi",
            IndicatorField::MaShort => "ma_short",
            IndicatorField::MaLong => "ma_long",
            IndicatorField::Macd => "macd",
            IndicatorField::MacdSignal => "macd_signal",
        }
    }

    pub fn from_name(name: &str) -> Option<IndicatorField> {
        IndicatorField::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for IndicatorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Windows and spans for the indicator columns, settable from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_window: usize,
    pub ma_short: usize,
    pub ma_long: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            rsi_window: 14,
            ma_short: 50,
            ma_long: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

/// Per-bar derived values, aligned 1:1 with the price series by index.
/// Computed once per run, read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub rsi: Vec<Option<f64>>,
    pub ma_short: Vec<Option<f64>>,
    pub ma_long: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
}

impl IndicatorFrame {
    pub fn compute(bars: &[PriceBar], params: &IndicatorParams) -> IndicatorFrame {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let (macd_line, signal_line) = macd::macd(
            &closes,
            params.macd_fast,
            params.macd_slow,
            params.macd_signal,
        );

        IndicatorFrame {
            rsi: rsi::rsi(&closes, params.rsi_window),
            ma_short: sma::sma(&closes, params.ma_short),
            ma_long: sma::sma(&closes, params.ma_long),
            macd: macd_line.into_iter().map(Some).collect(),
            macd_signal: signal_line.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rsi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }

    /// The value of one column at one bar, or `None` during warm-up or
    /// past the end of the series.
    pub fn value(&self, field: IndicatorField, index: usize) -> Option<f64> {
        let column = match field {
            IndicatorField::Rsi => &self.rsi,
            IndicatorField::MaShort => &self.ma_short,
            IndicatorField::MaLong => &self.ma_long,
            IndicatorField::Macd => &self.macd,
            IndicatorField::MacdSignal => &self.macd_signal,
        };
        column.get(index).copied().flatten()
    }
}
