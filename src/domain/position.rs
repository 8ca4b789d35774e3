//! The single open position held by the simulator.

use chrono::NaiveDate;

/// Replaced, never mutated, on every switch. Shares are fractional.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub shares: f64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
}

impl Position {
    /// Puts all of `capital` into `symbol` at `price`.
    pub fn open(symbol: impl Into<String>, capital: f64, price: f64, date: NaiveDate) -> Self {
        Position {
            symbol: symbol.into(),
            shares: capital / price,
            entry_price: price,
            entry_date: date,
        }
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares * price
    }

    /// Exit level for a stop `fraction` below entry.
    pub fn stop_price(&self, fraction: f64) -> f64 {
        self.entry_price * (1.0 - fraction)
    }

    /// True when an intraday `low` reaches the stop level.
    pub fn should_stop_loss(&self, low: f64, fraction: f64) -> bool {
        low <= self.stop_price(fraction)
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.shares * (price - self.entry_price)
    }
}
