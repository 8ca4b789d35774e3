//! Breakout of the 20-bar Donchian channel.
//!
//! The latest close is compared with the channel as of the previous bar, so
//! the current bar's own high and low never widen the band it is tested
//! against.

use super::last_two_closes;
use crate::domain::indicator::donchian::calculate_donchian;
use crate::domain::indicator::IndicatorValue;
use crate::domain::price::PriceBar;
use crate::domain::signal::{Signal, SignalScore};

pub const PERIOD: usize = 20;
pub const MIN_BARS: usize = 20;

pub fn analyze_donchian(bars: &[PriceBar]) -> Signal {
    if bars.len() < MIN_BARS {
        return Signal::neutral();
    }
    let Some((close, _)) = last_two_closes(bars) else {
        return Signal::neutral();
    };

    let channel = calculate_donchian(bars, PERIOD);
    let Some(&IndicatorValue::Channel { upper, lower }) = channel.valid_from_end(1) else {
        return Signal::neutral();
    };

    if close > upper {
        Signal::enter(SignalScore::StrongBullish, close)
    } else if close < lower {
        Signal::exit(SignalScore::StrongBearish, close)
    } else {
        Signal::neutral()
    }
}
