//! Append-only investment ledger written by the backtest simulator.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LedgerAction {
    Switch,
    StopLoss,
    Reevaluate,
}

impl fmt::Display for LedgerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LedgerAction::Switch => "Switch",
            LedgerAction::StopLoss => "StopLoss",
            LedgerAction::Reevaluate => "Reevaluate",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub symbol: String,
    pub action: LedgerAction,
    pub shares: f64,
    pub price: f64,
    pub portfolio_value: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the simulator writes here; entries arrive in date order.
    pub(crate) fn record(&mut self, entry: LedgerEntry) {
        debug_assert!(
            self.entries.last().is_none_or(|last| last.date <= entry.date),
            "ledger entries must be chronological"
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Portfolio value on the last row, if any.
    pub fn final_value(&self) -> Option<f64> {
        self.entries.last().map(|e| e.portfolio_value)
    }

    pub fn count(&self, action: LedgerAction) -> usize {
        self.entries.iter().filter(|e| e.action == action).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u32, action: LedgerAction, value: f64) -> LedgerEntry {
        LedgerEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            symbol: "AAA".into(),
            action,
            shares: 10.0,
            price: value / 10.0,
            portfolio_value: value,
        }
    }

    #[test]
    fn empty_ledger() {
        let ledger = Ledger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.final_value(), None);
    }

    #[test]
    fn final_value_is_last_row() {
        let mut ledger = Ledger::new();
        ledger.record(entry(1, LedgerAction::Switch, 1_000.0));
        ledger.record(entry(15, LedgerAction::Reevaluate, 1_100.0));
        ledger.record(entry(20, LedgerAction::StopLoss, 950.0));
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.final_value(), Some(950.0));
        assert_eq!(ledger.count(LedgerAction::Reevaluate), 1);
        assert_eq!(ledger.entries()[0].action, LedgerAction::Switch);
    }

    #[test]
    fn action_display() {
        assert_eq!(LedgerAction::StopLoss.to_string(), "StopLoss");
    }
}
