//! Simple moving average of volume (current bar included).
//!
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PriceBar;

pub fn calculate_volume_sma(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::empty(IndicatorType::VolumeSma(period));
    }

    // each window is summed afresh so no rounding carries between bars
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match (i + 1).checked_sub(period) {
            Some(start) => {
                let sum: f64 = bars[start..=i].iter().map(|b| b.volume).sum();
                IndicatorPoint::simple(bar.date, sum / period as f64)
            }
            None => IndicatorPoint::warmup(bar.date),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::VolumeSma(period),
        values,
    }
}
