//! Walk-forward single-position backtest.
//!
//! The simulator owns all mutable state of a run (cash value, the open
//! position, the current date and the ledger) and steps through fixed
//! reevaluation periods:
//!
//! 1. no candidate on `current_date`: advance one period, nothing recorded
//! 2. candidate differs from the held symbol: switch at that day's open
//! 3. scan the period's bars for a stop-loss breach; on breach exit at the
//!    stop price, re-enter via step 2 on the breach date and stop scanning
//! 4. no breach: mark to market at the period end's open (`Reevaluate`)
//!
//! The run ends once `current_date` passes `end_date`.

use crate::domain::ledger::{Ledger, LedgerAction, LedgerEntry};
use crate::domain::position::Position;
use crate::domain::price::PriceHistory;
use crate::domain::score_table::ScoreTable;
use crate::domain::selector::select_best;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub stop_loss_fraction: f64,
    pub reevaluation_days: u32,
}

impl BacktestConfig {
    pub fn period(&self) -> Duration {
        Duration::days(i64::from(self.reevaluation_days))
    }

    /// Upper bound on the number of periods a run can take.
    pub fn period_count(&self) -> u64 {
        if self.reevaluation_days == 0 || self.end_date < self.start_date {
            return 0;
        }
        let days = (self.end_date - self.start_date).num_days() as u64;
        days / u64::from(self.reevaluation_days) + 1
    }
}

/// What the Enter/Switch transition did.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// No scored instrument on that date.
    NoCandidate,
    /// Best candidate is already held.
    Held,
    /// A new position was opened.
    Switched { symbol: String },
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub ledger: Ledger,
    pub initial_capital: f64,
    pub final_value: f64,
    pub final_position: Option<Position>,
}

pub struct Simulator<'a> {
    config: BacktestConfig,
    table: &'a ScoreTable,
    prices: HashMap<&'a str, &'a PriceHistory>,
    portfolio_value: f64,
    position: Option<Position>,
    current_date: NaiveDate,
    ledger: Ledger,
}

impl<'a> Simulator<'a> {
    /// Starts in cash on the first scored date at or after `start_date`.
    pub fn new(config: BacktestConfig, table: &'a ScoreTable, histories: &'a [PriceHistory]) -> Self {
        let current_date = table
            .first_date_on_or_after(config.start_date)
            .filter(|d| *d <= config.end_date)
            .unwrap_or(config.start_date);

        Simulator {
            portfolio_value: config.initial_capital,
            prices: histories.iter().map(|h| (h.symbol.as_str(), h)).collect(),
            config,
            table,
            position: None,
            current_date,
            ledger: Ledger::new(),
        }
    }

    pub fn portfolio_value(&self) -> f64 {
        self.portfolio_value
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn is_finished(&self) -> bool {
        self.current_date > self.config.end_date
    }

    /// Open price on `date` for `symbol`, if it traded that day.
    fn open_on(&self, symbol: &str, date: NaiveDate) -> Option<f64> {
        self.prices
            .get(symbol)
            .and_then(|h| h.get_bar(date))
            .map(|b| b.open)
            .filter(|open| *open > 0.0)
    }

    /// Value of the held position at the last open on or before `date`.
    /// Falls back to the current value when no such bar exists.
    fn mark_value(&self, date: NaiveDate) -> f64 {
        let Some(position) = &self.position else {
            return self.portfolio_value;
        };
        self.prices
            .get(position.symbol.as_str())
            .and_then(|h| h.bar_at_or_before(date))
            .map(|bar| position.market_value(bar.open))
            .unwrap_or(self.portfolio_value)
    }

    /// Enter/Switch. Re-entrant: also called on a stop-loss breach date.
    pub fn enter_or_switch(&mut self, date: NaiveDate) -> Transition {
        let Some(candidate) = select_best(date, self.table) else {
            return Transition::NoCandidate;
        };

        if self
            .position
            .as_ref()
            .is_some_and(|p| p.symbol == candidate.symbol)
        {
            return Transition::Held;
        }

        let Some(entry_price) = self.open_on(&candidate.symbol, date) else {
            warn!(symbol = %candidate.symbol, %date, "no usable open price, cannot enter");
            return Transition::NoCandidate;
        };

        self.portfolio_value = self.mark_value(date);
        let position = Position::open(&candidate.symbol, self.portfolio_value, entry_price, date);

        debug!(
            symbol = %position.symbol,
            %date,
            shares = position.shares,
            score = candidate.score,
            "switching position"
        );
        self.ledger.record(LedgerEntry {
            date,
            symbol: position.symbol.clone(),
            action: LedgerAction::Switch,
            shares: position.shares,
            price: entry_price,
            portfolio_value: self.portfolio_value,
        });
        self.position = Some(position);

        Transition::Switched {
            symbol: candidate.symbol,
        }
    }

    /// Scans bars of the held symbol in `[from, to]` for a stop-loss breach.
    ///
    /// On the first breach the position is closed at the stop price, a new
    /// one is selected for that same date and the breach date is returned.
    pub fn monitor_period(&mut self, from: NaiveDate, to: NaiveDate) -> Option<NaiveDate> {
        let position = self.position.as_ref()?;
        let history = self.prices.get(position.symbol.as_str())?;
        let fraction = self.config.stop_loss_fraction;

        let breach = history
            .range(from, to)
            .iter()
            .find(|bar| position.should_stop_loss(bar.low, fraction))?;
        let breach_date = breach.date;

        let exit_price = position.stop_price(fraction);
        let shares = position.shares;
        let symbol = position.symbol.clone();
        self.portfolio_value = shares * exit_price;

        info!(symbol = %symbol, date = %breach_date, exit_price, "stop-loss triggered");
        self.ledger.record(LedgerEntry {
            date: breach_date,
            symbol,
            action: LedgerAction::StopLoss,
            shares,
            price: exit_price,
            portfolio_value: self.portfolio_value,
        });
        self.position = None;

        if self.enter_or_switch(breach_date) == Transition::NoCandidate {
            debug!(date = %breach_date, "no candidate after stop-loss, holding cash");
        }

        Some(breach_date)
    }

    /// Marks the position to market at `date` and records it.
    fn reevaluate(&mut self, date: NaiveDate) {
        let Some(position) = &self.position else {
            return;
        };
        let price = self
            .prices
            .get(position.symbol.as_str())
            .and_then(|h| h.bar_at_or_before(date))
            .map(|bar| bar.open);
        let Some(price) = price else {
            return;
        };

        self.portfolio_value = position.market_value(price);
        self.ledger.record(LedgerEntry {
            date,
            symbol: position.symbol.clone(),
            action: LedgerAction::Reevaluate,
            shares: position.shares,
            price,
            portfolio_value: self.portfolio_value,
        });
    }

    /// Runs one reevaluation period starting at `current_date`.
    ///
    /// A period with no candidate on its first date is skipped whole: a held
    /// position carries over untouched and its stop-loss is not scanned.
    pub fn step(&mut self) {
        let date = self.current_date;
        let period_end = (date + self.config.period()).min(self.config.end_date);

        if self.enter_or_switch(date) != Transition::NoCandidate {
            if self.monitor_period(date, period_end).is_none() {
                self.reevaluate(period_end);
            }
        } else {
            debug!(%date, "no candidate");
        }

        self.current_date = date + self.config.period();
    }

    pub fn run(self) -> BacktestResult {
        self.run_with_progress(|_| {})
    }

    /// Steps until finished; `progress` sees the date of each period.
    pub fn run_with_progress<F>(mut self, mut progress: F) -> BacktestResult
    where
        F: FnMut(NaiveDate),
    {
        if self.config.reevaluation_days == 0 {
            warn!("reevaluation period is zero, nothing to simulate");
            return self.finish();
        }
        while !self.is_finished() {
            progress(self.current_date);
            self.step();
        }
        self.finish()
    }

    fn finish(self) -> BacktestResult {
        info!(
            entries = self.ledger.len(),
            final_value = self.portfolio_value,
            "backtest finished"
        );
        BacktestResult {
            ledger: self.ledger,
            initial_capital: self.config.initial_capital,
            final_value: self.portfolio_value,
            final_position: self.position,
        }
    }
}

/// Convenience wrapper for a whole run.
pub fn run_backtest(
    config: BacktestConfig,
    table: &ScoreTable,
    histories: &[PriceHistory],
) -> BacktestResult {
    Simulator::new(config, table, histories).run()
}
