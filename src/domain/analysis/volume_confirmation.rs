//! Price move confirmed by above-average volume (20-bar SMA, current bar
//! included in the average).

use super::last_two_closes;
use crate::domain::indicator::volume_sma::calculate_volume_sma;
use crate::domain::price::PriceBar;
use crate::domain::signal::{Signal, SignalScore};

pub const PERIOD: usize = 20;
pub const MIN_BARS: usize = 20;

pub fn analyze_volume(bars: &[PriceBar]) -> Signal {
    if bars.len() < MIN_BARS {
        return Signal::neutral();
    }
    let (Some((close, prev_close)), Some(last)) = (last_two_closes(bars), bars.last()) else {
        return Signal::neutral();
    };

    let heavy = calculate_volume_sma(bars, PERIOD)
        .simple_from_end(0)
        .is_some_and(|avg| last.volume > avg);

    if close > prev_close && heavy {
        Signal::enter(SignalScore::StrongBullish, close)
    } else if close < prev_close && heavy {
        Signal::exit(SignalScore::StrongBearish, close)
    } else {
        Signal::neutral()
    }
}
