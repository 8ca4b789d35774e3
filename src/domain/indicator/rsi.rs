//! Relative Strength Index over closing prices.
//!
//! Gains and losses are smoothed with alpha = 1/n starting from the first
//! bar, whose change counts as zero (see `exp_smooth`).
//! RSI = 100 - 100 / (1 + RS); an average loss of zero gives 100.
//! The first n-1 bars are warm-up, so n bars give one reading.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::exp_smooth;
use crate::domain::price::PriceBar;

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut series = IndicatorSeries::empty(IndicatorType::Rsi(period));
    if period == 0 {
        series.values = bars.iter().map(|b| IndicatorPoint::warmup(b.date)).collect();
        return series;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let change = i.checked_sub(1).map_or(0.0, |p| bar.close - bars[p].close);
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let alpha = 1.0 / period as f64;
    let avg_gain = exp_smooth(&gains, alpha);
    let avg_loss = exp_smooth(&losses, alpha);

    series.values = bars
        .iter()
        .zip(avg_gain.into_iter().zip(avg_loss))
        .enumerate()
        .map(|(i, (bar, (gain, loss)))| {
            if i + 1 < period {
                IndicatorPoint::warmup(bar.date)
            } else {
                IndicatorPoint::simple(bar.date, rsi_value(gain, loss))
            }
        })
        .collect();

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorValue;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn rsi_single_bar() {
        let series = calculate_rsi(&make_bars(&[100.0]), 14);
        assert_eq!(series.values.len(), 1);
        assert!(!series.values[0].valid);
    }

    #[test]
    fn rsi_warmup_period() {
        let closes: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&make_bars(&closes), 14);

        assert_eq!(series.values.len(), 15);
        for i in 0..13 {
            assert!(!series.values[i].valid, "Bar {} should be invalid", i);
        }
        assert!(series.values[13].valid, "the 14th bar carries the first reading");
        assert!(series.values[14].valid);
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_bars(&closes), 14);
        assert_eq!(series.simple_from_end(0), Some(100.0));
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_bars(&closes), 14);
        assert_eq!(series.simple_from_end(0), Some(0.0));
    }

    #[test]
    fn rsi_matches_hand_computed_smoothing() {
        // changes 0, +2, -1, +2, -1 with alpha = 1/4:
        // avg gain 0, 0.5, 0.375, 0.78125, 0.5859375
        // avg loss 0, 0, 0.25, 0.1875, 0.390625
        let series = calculate_rsi(&make_bars(&[10.0, 12.0, 11.0, 13.0, 12.0]), 4);
        let expected_prev = 100.0 - 100.0 / (1.0 + 0.78125 / 0.1875);
        assert!((series.simple_from_end(1).unwrap() - expected_prev).abs() < 1e-9);
        assert!((series.simple_from_end(0).unwrap() - 60.0).abs() < 1e-9);
        assert_eq!(series.simple_from_end(2), None);
    }

    #[test]
    fn fourteen_bars_give_a_reading() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_bars(&closes), 14);
        assert_eq!(series.simple_from_end(0), Some(0.0));
        assert_eq!(series.simple_from_end(1), None);
    }

    #[test]
    fn rsi_in_range() {
        let closes: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&make_bars(&closes), 14);

        for point in series.values.iter().filter(|p| p.valid) {
            if let IndicatorValue::Simple(rsi) = point.value {
                assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
            }
        }
    }

    #[test]
    fn rsi_zero_period() {
        let series = calculate_rsi(&make_bars(&[100.0, 101.0]), 0);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
