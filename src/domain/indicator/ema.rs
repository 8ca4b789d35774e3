//! Exponential Moving Average of closing price.
//!
//! k = 2/(n+1). The average starts at the first close and follows
//! EMA[i] = EMA[i-1] + k*(C[i] - EMA[i-1]) on every later bar, so a close
//! equal to the running EMA leaves it bit-for-bit unchanged.
//! Warmup: the first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::exp_smooth;
use crate::domain::price::PriceBar;

pub fn calculate_ema(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut series = IndicatorSeries::empty(IndicatorType::Ema(period));
    if period == 0 {
        return series;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    series.values = bars
        .iter()
        .zip(exp_smooth(&closes, k))
        .enumerate()
        .map(|(i, (bar, ema))| {
            if i + 1 < period {
                IndicatorPoint::warmup(bar.date)
            } else {
                IndicatorPoint::simple(bar.date, ema)
            }
        })
        .collect();

    series
}
