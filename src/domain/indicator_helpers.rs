//! Shared helper functions for indicator calculations.

use crate::domain::price::PriceBar;

/// True range per bar. The first bar has no previous close, so it uses high - low.
pub fn true_ranges(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}

/// Wilder smoothing of `values[offset..]`.
///
/// The first output sits at `offset + period - 1` and is the simple mean of the
/// first `period` inputs; after that `avg = (prev * (n-1) + x) / n`. Earlier
/// positions are `None`. The returned vector has the same length as `values`.
pub fn wilder_smooth(values: &[f64], offset: usize, period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < offset + period {
        return out;
    }

    let seed_end = offset + period - 1;
    let mut avg = values[offset..=seed_end].iter().sum::<f64>() / period as f64;
    out[seed_end] = Some(avg);

    for i in (seed_end + 1)..values.len() {
        avg = (avg * (period - 1) as f64 + values[i]) / period as f64;
        out[i] = Some(avg);
    }

    out
}

/// Exponential smoothing seeded with the first value:
/// `s[0] = x[0]`, then `s[i] = s[i-1] + alpha * (x[i] - s[i-1])`.
///
/// Every position gets a value; callers decide how many to treat as warm-up.
pub fn exp_smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut running: Option<f64> = None;
    for &x in values {
        let next = running.map_or(x, |prev| prev + alpha * (x - prev));
        running = Some(next);
        out.push(next);
    }
    out
}
