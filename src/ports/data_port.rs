//! Price data source port trait.

use chrono::NaiveDate;

use crate::domain::error::TrendsigError;
use crate::domain::ohlcv::PriceBar;

pub trait DataPort {
    /// Bars for one symbol within the date window, oldest first.
    /// An empty result is a data fault the caller treats as "skip this
    /// symbol", never as a batch-wide failure.
    fn fetch(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TrendsigError>;

    fn list_symbols(&self) -> Result<Vec<String>, TrendsigError>;
}
