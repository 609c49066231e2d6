//! Exponential Moving Average.
//!
//! k = 2/(span+1), seeded with the first observed value, so the series is
//! defined from index 0 with no warm-up gap. This is the recursive
//! `ewm(adjust=False)` form, not the SMA-seeded variant.

/// EMA of `values` with the given span. Empty input or a zero span yield
/// an empty output.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut current = values[0];
    out.push(current);

    for &value in &values[1..] {
        current = value * k + current * (1.0 - k);
        out.push(current);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn seeded_with_first_value() {
        let out = ema(&[10.0, 20.0, 30.0], 5);
        assert_relative_eq!(out[0], 10.0);
    }

    #[test]
    fn recursive_form() {
        let out = ema(&[10.0, 20.0], 3);
        // k = 0.5 -> 20*0.5 + 10*0.5 = 15
        assert_relative_eq!(out[1], 15.0);
    }

    #[test]
    fn span_one_is_identity() {
        let values = [10.0, 20.0, 30.0];
        let out = ema(&values, 1);
        for (e, v) in out.iter().zip(values.iter()) {
            assert_relative_eq!(e, v);
        }
    }

    #[test]
    fn constant_input_stays_constant() {
        let out = ema(&[7.0; 40], 12);
        for value in out {
            assert_relative_eq!(value, 7.0);
        }
    }

    #[test]
    fn output_aligned_with_input() {
        assert_eq!(ema(&[1.0, 2.0, 3.0, 4.0], 9).len(), 4);
    }

    #[test]
    fn zero_span_or_empty_input() {
        assert!(ema(&[1.0, 2.0], 0).is_empty());
        assert!(ema(&[], 9).is_empty());
    }
}
