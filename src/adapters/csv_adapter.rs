//! CSV price-file data adapter.
//!
//! Reads `{base_path}/{SYMBOL}.csv` with a `date,open,high,low,close,volume`
//! header (the layout the fetch script writes). Rows outside the requested
//! window are dropped; output is sorted by date.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::error::TrendsigError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, TrendsigError> {
    record
        .get(index)
        .ok_or_else(|| TrendsigError::Data {
            reason: format!("missing {} column", name),
        })?
        .parse()
        .map_err(|e| TrendsigError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvDataAdapter {
    fn fetch(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TrendsigError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| TrendsigError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TrendsigError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| TrendsigError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TrendsigError::Data {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(PriceBar {
                symbol: symbol.to_string(),
                date,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TrendsigError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TrendsigError::Data {
            reason: format!("failed to read directory {}: {}", self.base_path.display(), e),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TrendsigError::Data {
                reason: format!("directory entry error: {}", e),
            })?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(symbol) = name.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
