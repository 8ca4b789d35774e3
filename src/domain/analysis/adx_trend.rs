//! Trend strength from ADX(14) with +DI / -DI direction.
//!
//! ADX above 25 means a strong trend: the dominant DI picks the side.
//! ADX below 20 is a weak trend and scores neutral. The 20-25 band also
//! scores neutral.

use crate::domain::indicator::adx::calculate_adx;
use crate::domain::indicator::IndicatorValue;
use crate::domain::price::PriceBar;
use crate::domain::signal::{Signal, SignalScore};

pub const PERIOD: usize = 14;
pub const MIN_BARS: usize = 14;
pub const STRONG_TREND: f64 = 25.0;
pub const WEAK_TREND: f64 = 20.0;

pub fn analyze_adx(bars: &[PriceBar]) -> Signal {
    let Some(last) = bars.last() else {
        return Signal::neutral();
    };
    if bars.len() < MIN_BARS {
        return Signal::neutral();
    }

    match calculate_adx(bars, PERIOD).valid_from_end(0) {
        Some(&IndicatorValue::Directional {
            adx,
            plus_di,
            minus_di,
        }) => classify(adx, plus_di, minus_di, last.close),
        _ => Signal::neutral(),
    }
}

pub fn classify(adx: f64, plus_di: f64, minus_di: f64, close: f64) -> Signal {
    if adx > STRONG_TREND {
        if plus_di > minus_di {
            Signal::enter(SignalScore::StrongBullish, close)
        } else {
            Signal::exit(SignalScore::StrongBearish, close)
        }
    } else {
        // below WEAK_TREND and the 20-25 band alike
        Signal::neutral()
    }
}
