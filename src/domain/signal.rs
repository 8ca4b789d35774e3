//! Discrete analyzer output: a 1-5 score plus an optional price hint.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignalScore {
    StrongBearish = 1,
    MildBearish = 2,
    Neutral = 3,
    MildBullish = 4,
    StrongBullish = 5,
}

impl SignalScore {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn is_bullish(self) -> bool {
        self > SignalScore::Neutral
    }

    pub fn is_bearish(self) -> bool {
        self < SignalScore::Neutral
    }
}

impl fmt::Display for SignalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Suggested entry or exit price. Never both.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PriceHint {
    #[default]
    None,
    Entry(f64),
    Exit(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub score: SignalScore,
    pub hint: PriceHint,
}

impl Signal {
    /// Score 3 with no hint; also the result for too-short histories.
    pub fn neutral() -> Self {
        Signal {
            score: SignalScore::Neutral,
            hint: PriceHint::None,
        }
    }

    pub fn enter(score: SignalScore, price: f64) -> Self {
        Signal {
            score,
            hint: PriceHint::Entry(price),
        }
    }

    pub fn exit(score: SignalScore, price: f64) -> Self {
        Signal {
            score,
            hint: PriceHint::Exit(price),
        }
    }

    pub fn entry_price(&self) -> Option<f64> {
        match self.hint {
            PriceHint::Entry(p) => Some(p),
            _ => None,
        }
    }

    pub fn exit_price(&self) -> Option<f64> {
        match self.hint {
            PriceHint::Exit(p) => Some(p),
            _ => None,
        }
    }
}
