//! Daily OHLCV bar representation and series validation.

use chrono::NaiveDate;

use crate::domain::error::TrendsigError;

/// One daily bar for one instrument. Immutable once ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Check the series invariants before a run: strictly increasing dates and
/// strictly positive prices. Both are configuration-class faults, the
/// numeric model downstream assumes them.
pub fn validate_series(symbol: &str, bars: &[PriceBar]) -> Result<(), TrendsigError> {
    for (i, bar) in bars.iter().enumerate() {
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(TrendsigError::UnorderedSeries {
                symbol: symbol.to_string(),
                date: bar.date,
            });
        }
        for price in [bar.open, bar.high, bar.low, bar.close] {
            if !(price > 0.0) || !price.is_finite() {
                return Err(TrendsigError::InvalidPrice {
                    symbol: symbol.to_string(),
                    date: bar.date,
                    price,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            symbol: "TSLA".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000.0,
        }
    }

    #[test]
    fn valid_series_passes() {
        let bars = vec![bar(1, 100.0), bar(2, 101.0), bar(3, 99.5)];
        assert!(validate_series("TSLA", &bars).is_ok());
    }

    #[test]
    fn empty_series_passes() {
        assert!(validate_series("TSLA", &[]).is_ok());
    }

    #[test]
    fn duplicate_date_rejected() {
        let bars = vec![bar(1, 100.0), bar(1, 101.0)];
        let err = validate_series("TSLA", &bars).unwrap_err();
        assert!(matches!(err, TrendsigError::UnorderedSeries { .. }));
    }

    #[test]
    fn backwards_date_rejected() {
        let bars = vec![bar(5, 100.0), bar(3, 101.0)];
        let err = validate_series("TSLA", &bars).unwrap_err();
        assert!(matches!(err, TrendsigError::UnorderedSeries { .. }));
    }

    #[test]
    fn zero_price_rejected() {
        let mut bad = bar(2, 100.0);
        bad.low = 0.0;
        let bars = vec![bar(1, 100.0), bad];
        let err = validate_series("TSLA", &bars).unwrap_err();
        assert!(matches!(err, TrendsigError::InvalidPrice { price, .. } if price == 0.0));
    }

    #[test]
    fn negative_close_rejected() {
        let bars = vec![bar(1, -5.0)];
        let err = validate_series("TSLA", &bars).unwrap_err();
        assert!(matches!(err, TrendsigError::InvalidPrice { .. }));
    }

    #[test]
    fn nan_price_rejected() {
        let bars = vec![bar(1, f64::NAN)];
        let err = validate_series("TSLA", &bars).unwrap_err();
        assert!(matches!(err, TrendsigError::InvalidPrice { .. }));
    }
}
