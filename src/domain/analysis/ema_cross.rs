//! Trend crossover of the 20- and 50-period EMAs of close.
//!
//! | condition                                   | score | hint  |
//! |---------------------------------------------|-------|-------|
//! | fast crosses above slow on the latest bar   | 5     | entry |
//! | fast crosses below slow on the latest bar   | 1     | exit  |
//! | fast above slow                             | 4     | entry |
//! | anything else                               | 2     | exit  |

use crate::domain::indicator::ema::calculate_ema;
use crate::domain::price::PriceBar;
use crate::domain::signal::{Signal, SignalScore};

pub const FAST_PERIOD: usize = 20;
pub const SLOW_PERIOD: usize = 50;
pub const MIN_BARS: usize = 50;

pub fn analyze_ema(bars: &[PriceBar]) -> Signal {
    let Some(last) = bars.last() else {
        return Signal::neutral();
    };
    if bars.len() < MIN_BARS {
        return Signal::neutral();
    }

    let fast = calculate_ema(bars, FAST_PERIOD);
    let slow = calculate_ema(bars, SLOW_PERIOD);

    let pair = |back| fast.simple_from_end(back).zip(slow.simple_from_end(back));
    let above = |back| matches!(pair(back), Some((f, s)) if f > s);
    let below = |back| matches!(pair(back), Some((f, s)) if f < s);

    if above(0) && below(1) {
        Signal::enter(SignalScore::StrongBullish, last.close)
    } else if below(0) && above(1) {
        Signal::exit(SignalScore::StrongBearish, last.close)
    } else if above(0) {
        Signal::enter(SignalScore::MildBullish, last.close)
    } else {
        Signal::exit(SignalScore::MildBearish, last.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::test_support::{bars_from_closes, flat};
    use crate::domain::indicator::IndicatorValue;

    /// Index of the first bar where fast - slow changes sign in the wanted
    /// direction, computed on the full series.
    fn first_cross(bars: &[PriceBar], upward: bool) -> usize {
        let fast = calculate_ema(bars, FAST_PERIOD);
        let slow = calculate_ema(bars, SLOW_PERIOD);
        (SLOW_PERIOD..bars.len())
            .find(|&i| {
                let diff = |j: usize| match (&fast.values[j].value, &slow.values[j].value) {
                    (IndicatorValue::Simple(f), IndicatorValue::Simple(s)) => f - s,
                    _ => unreachable!(),
                };
                if upward {
                    diff(i) > 0.0 && diff(i - 1) < 0.0
                } else {
                    diff(i) < 0.0 && diff(i - 1) > 0.0
                }
            })
            .expect("synthetic series must contain a crossover")
    }

    fn v_shape() -> Vec<PriceBar> {
        let mut closes: Vec<f64> = (0..80).map(|i| 200.0 - i as f64).collect();
        closes.extend((1..=60).map(|i| 121.0 + 4.0 * i as f64));
        bars_from_closes(&closes)
    }

    fn inverted_v() -> Vec<PriceBar> {
        let mut closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
        closes.extend((1..=60).map(|i| 179.0 - 2.5 * i as f64));
        bars_from_closes(&closes)
    }

    #[test]
    fn golden_cross_on_last_bar() {
        let bars = v_shape();
        let i = first_cross(&bars, true);
        let prefix = &bars[..=i];
        let signal = analyze_ema(prefix);
        assert_eq!(signal.score, SignalScore::StrongBullish);
        assert_eq!(signal.entry_price(), Some(prefix[i].close));
        assert_eq!(signal.exit_price(), None);
    }

    #[test]
    fn day_after_golden_cross_is_mild_bullish() {
        let bars = v_shape();
        let i = first_cross(&bars, true);
        let signal = analyze_ema(&bars[..=i + 1]);
        assert_eq!(signal.score, SignalScore::MildBullish);
        assert_eq!(signal.entry_price(), Some(bars[i + 1].close));
    }

    #[test]
    fn death_cross_on_last_bar() {
        let bars = inverted_v();
        let i = first_cross(&bars, false);
        let prefix = &bars[..=i];
        let signal = analyze_ema(prefix);
        assert_eq!(signal.score, SignalScore::StrongBearish);
        assert_eq!(signal.exit_price(), Some(prefix[i].close));
        assert_eq!(signal.entry_price(), None);
    }

    #[test]
    fn steady_decline_is_mild_bearish() {
        let closes: Vec<f64> = (0..70).map(|i| 200.0 - i as f64).collect();
        let signal = analyze_ema(&bars_from_closes(&closes));
        assert_eq!(signal.score, SignalScore::MildBearish);
        assert_eq!(signal.exit_price(), Some(131.0));
    }

    #[test]
    fn flat_prices_fall_through_to_mild_bearish() {
        let signal = analyze_ema(&flat(60, 10.0));
        assert_eq!(signal.score, SignalScore::MildBearish);
        assert_eq!(signal.exit_price(), Some(10.0));
    }

    #[test]
    fn forty_nine_bars_is_neutral() {
        assert_eq!(analyze_ema(&flat(49, 10.0)), Signal::neutral());
    }
}
