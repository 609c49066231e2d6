//! Domain error types.

/// A parse error with position information for rule parsing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for trendsig.
///
/// Three fault classes with different handling:
/// - data faults (`NoData`, `InsufficientData`, `Data`): skip the symbol,
///   the batch keeps running
/// - configuration faults (`Config*`, `RuleParse`, `InvalidPrice`,
///   `UnorderedSeries`): fail the run immediately, never retried
/// - external-service faults (`Notify`, `Chart`): logged and swallowed at
///   the adapter boundary
#[derive(Debug, thiserror::Error)]
pub enum TrendsigError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    RuleParse(#[from] ParseError),

    #[error("non-positive price {price} for {symbol} on {date}")]
    InvalidPrice {
        symbol: String,
        date: chrono::NaiveDate,
        price: f64,
    },

    #[error("price series for {symbol} is not strictly ordered at {date}")]
    UnorderedSeries {
        symbol: String,
        date: chrono::NaiveDate,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("notification failed: {reason}")]
    Notify { reason: String },

    #[error("chart rendering failed: {reason}")]
    Chart { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TrendsigError> for std::process::ExitCode {
    fn from(err: &TrendsigError) -> Self {
        let code: u8 = match err {
            TrendsigError::Io(_) => 1,
            TrendsigError::ConfigParse { .. }
            | TrendsigError::ConfigMissing { .. }
            | TrendsigError::ConfigInvalid { .. }
            | TrendsigError::InvalidPrice { .. }
            | TrendsigError::UnorderedSeries { .. } => 2,
            TrendsigError::Data { .. }
            | TrendsigError::Notify { .. }
            | TrendsigError::Chart { .. } => 3,
            TrendsigError::RuleParse(_) => 4,
            TrendsigError::NoData { .. } | TrendsigError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_caret_position() {
        let err = ParseError {
            message: "expected rule".into(),
            position: 4,
        };
        let rendered = err.display_with_context("AND(bogus)");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "AND(bogus)");
        assert_eq!(lines[1], "    ^");
        assert!(lines[2].contains("position 4"));
    }

    #[test]
    fn invalid_price_message_names_symbol_and_date() {
        let err = TrendsigError::InvalidPrice {
            symbol: "TSLA".into(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            price: -1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("TSLA"));
        assert!(msg.contains("2024-03-01"));
    }
}
