//! Relative Strength Index.
//!
//! Gains and losses are averaged with a plain rolling mean over the trailing
//! `window` deltas, not Wilder's exponential smoothing; the strategies were
//! calibrated against the rolling-mean variant.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! A window with no losses reads 100; a window with no movement at all
//! reads 50 (gain/loss would otherwise be 0/0).
//!
//! Warm-up: bar i has a value only once `window` deltas exist, i.e. from
//! index `window` onwards.

/// Rolling-mean RSI over `closes`.
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 || closes.len() < 2 {
        return vec![None; closes.len()];
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let mut values = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        if i < window {
            values.push(None);
            continue;
        }

        let trailing = &deltas[i - window..i];
        let gain: f64 = trailing.iter().filter(|&&d| d > 0.0).sum::<f64>() / window as f64;
        let loss: f64 =
            -trailing.iter().filter(|&&d| d < 0.0).sum::<f64>() / window as f64;

        let value = if loss == 0.0 && gain == 0.0 {
            50.0
        } else if loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        };
        values.push(Some(value));
    }

    values
}
