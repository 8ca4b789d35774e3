//! Momentum from the 14-period RSI.
//!
//! Divergence between price and RSI is checked before the oversold /
//! overbought thresholds.

use super::last_two_closes;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::price::PriceBar;
use crate::domain::signal::{Signal, SignalScore};

pub const PERIOD: usize = 14;
pub const MIN_BARS: usize = 14;
pub const OVERSOLD: f64 = 30.0;
pub const OVERBOUGHT: f64 = 70.0;

pub fn analyze_rsi(bars: &[PriceBar]) -> Signal {
    if bars.len() < MIN_BARS {
        return Signal::neutral();
    }
    let Some((close, prev_close)) = last_two_closes(bars) else {
        return Signal::neutral();
    };

    let rsi = calculate_rsi(bars, PERIOD);
    classify(close, prev_close, rsi.simple_from_end(0), rsi.simple_from_end(1))
}

/// Scores one bar from its close, the previous close and the two latest RSI
/// readings (`None` while RSI is still warming up).
pub fn classify(close: f64, prev_close: f64, now: Option<f64>, before: Option<f64>) -> Signal {
    let rsi_rose = matches!((now, before), (Some(a), Some(b)) if a > b);
    let rsi_fell = matches!((now, before), (Some(a), Some(b)) if a < b);

    if close < prev_close && rsi_rose {
        Signal::enter(SignalScore::StrongBullish, close)
    } else if close > prev_close && rsi_fell {
        Signal::exit(SignalScore::StrongBearish, close)
    } else if now.is_some_and(|v| v < OVERSOLD) {
        Signal::enter(SignalScore::MildBullish, close)
    } else if now.is_some_and(|v| v > OVERBOUGHT) {
        Signal::exit(SignalScore::MildBearish, close)
    } else {
        Signal::neutral()
    }
}
