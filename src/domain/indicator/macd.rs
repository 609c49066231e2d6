//! Moving Average Convergence Divergence.
//!
//! MACD line = EMA(fast) - EMA(slow); signal line = EMA of the MACD line.
//! Because the underlying EMAs are seeded from bar 0, both outputs are
//! defined for every bar of the input.

use crate::domain::indicator::ema::ema;

/// Returns `(macd_line, signal_line)`, each aligned with `closes`.
/// Zero spans or empty input yield empty outputs.
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> (Vec<f64>, Vec<f64>) {
    if closes.is_empty() || fast == 0 || slow == 0 || signal_span == 0 {
        return (Vec::new(), Vec::new());
    }

    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&line, signal_span);

    (line, signal_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defined_from_bar_zero() {
        let closes = [100.0, 101.0, 102.0];
        let (line, signal) = macd(&closes, 12, 26, 9);
        assert_eq!(line.len(), 3);
        assert_eq!(signal.len(), 3);
        // both EMAs seed on the first close, so the line starts at zero
        assert_relative_eq!(line[0], 0.0);
        assert_relative_eq!(signal[0], 0.0);
    }

    #[test]
    fn constant_series_stays_at_zero() {
        let closes = [50.0; 40];
        let (line, signal) = macd(&closes, 12, 26, 9);
        for (l, s) in line.iter().zip(signal.iter()) {
            assert_relative_eq!(*l, 0.0);
            assert_relative_eq!(*s, 0.0);
        }
    }

    #[test]
    fn rising_series_has_positive_line() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let (line, signal) = macd(&closes, 12, 26, 9);
        // fast EMA tracks a rising series more closely than the slow one
        assert!(line[39] > 0.0);
        assert!(line[39] > signal[39]);
    }

    #[test]
    fn line_is_fast_minus_slow() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + (i % 7) as f64).collect();
        let (line, _) = macd(&closes, 3, 5, 2);
        let fast = ema(&closes, 3);
        let slow = ema(&closes, 5);
        for i in 0..closes.len() {
            assert_relative_eq!(line[i], fast[i] - slow[i]);
        }
    }

    #[test]
    fn deterministic() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + ((i * 13) % 9) as f64).collect();
        let a = macd(&closes, 12, 26, 9);
        let b = macd(&closes, 12, 26, 9);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_span_yields_empty() {
        assert_eq!(macd(&[1.0, 2.0], 0, 26, 9), (Vec::new(), Vec::new()));
        assert_eq!(macd(&[1.0, 2.0], 12, 0, 9), (Vec::new(), Vec::new()));
        assert_eq!(macd(&[1.0, 2.0], 12, 26, 0), (Vec::new(), Vec::new()));
    }
}
