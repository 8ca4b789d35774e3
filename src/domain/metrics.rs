//! Summary statistics over a backtest ledger.
//!
//! The value curve is the initial capital followed by the `portfolio_value`
//! of every ledger row, in order.

use crate::domain::ledger::{Ledger, LedgerAction, LedgerEntry};
use chrono::NaiveDate;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_value: f64,
    pub total_return: f64,
    pub annualized_return: f64,
    pub max_drawdown: f64,
    /// Longest stretch, in calendar days, spent below a prior peak.
    pub max_drawdown_days: i64,
    pub switches: usize,
    pub stop_losses: usize,
    pub reevaluations: usize,
}

impl Metrics {
    pub fn compute(ledger: &Ledger, initial_capital: f64) -> Self {
        let entries = ledger.entries();
        let final_value = ledger.final_value().unwrap_or(initial_capital);

        let total_return = if initial_capital > 0.0 {
            (final_value - initial_capital) / initial_capital
        } else {
            0.0
        };

        let span_days = match (entries.first(), entries.last()) {
            (Some(first), Some(last)) => (last.date - first.date).num_days(),
            _ => 0,
        };
        let years = span_days as f64 / DAYS_PER_YEAR;
        let annualized_return = if years > 0.0 && total_return > -1.0 {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_days) = compute_drawdown(entries, initial_capital);

        Metrics {
            final_value,
            total_return,
            annualized_return,
            max_drawdown,
            max_drawdown_days,
            switches: ledger.count(LedgerAction::Switch),
            stop_losses: ledger.count(LedgerAction::StopLoss),
            reevaluations: ledger.count(LedgerAction::Reevaluate),
        }
    }
}

fn compute_drawdown(entries: &[LedgerEntry], initial_capital: f64) -> (f64, i64) {
    let Some(first) = entries.first() else {
        return (0.0, 0);
    };

    let mut peak = initial_capital;
    let mut peak_date: NaiveDate = first.date;
    let mut max_dd = 0.0_f64;
    let mut max_days = 0i64;

    for entry in entries {
        if entry.portfolio_value >= peak {
            peak = entry.portfolio_value;
            peak_date = entry.date;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - entry.portfolio_value) / peak);
            max_days = max_days.max((entry.date - peak_date).num_days());
        }
    }

    (max_dd, max_days)
}
