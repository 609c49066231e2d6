//! Chart sink port trait.

use std::path::Path;

use crate::domain::error::TrendsigError;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::SignalEvent;

/// Side-effect consumer of already-computed run data. Never mutates
/// engine state; a rendering failure must not suppress other side effects.
pub trait ChartPort {
    fn render(
        &self,
        symbol: &str,
        bars: &[PriceBar],
        frame: &IndicatorFrame,
        signals: &[SignalEvent],
        output: &Path,
    ) -> Result<(), TrendsigError>;
}
