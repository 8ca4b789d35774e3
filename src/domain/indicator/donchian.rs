//! Donchian channel: highest high / lowest low over the last n bars
//! (current bar included).
//!
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::PriceBar;

pub fn calculate_donchian(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::empty(IndicatorType::Donchian(period));
    }

    let warmup = period - 1;
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i < warmup {
                return IndicatorPoint {
                    date: bar.date,
                    valid: false,
                    value: IndicatorValue::Channel {
                        upper: 0.0,
                        lower: 0.0,
                    },
                };
            }
            let window = &bars[i + 1 - period..=i];
            let upper = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
            let lower = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Channel { upper, lower },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Donchian(period),
        values,
    }
}
