//! Long-form score table: one row per (date, symbol).
//!
//! Every row is computed from the instrument's prefix ending on that date,
//! so later bars can never influence it. Rows are kept sorted by date then
//! symbol, which makes the table identical whether it was built serially or
//! across threads.

use crate::domain::composite::{score_prefix, SignalBreakdown};
use crate::domain::error::ScoreTraderError;
use crate::domain::price::PriceHistory;
use crate::domain::universe::{SkipReason, SkippedSymbol};
use chrono::NaiveDate;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Project-wide history floor for a row to exist at all.
pub const MIN_SCORING_BARS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTableRow {
    pub date: NaiveDate,
    pub symbol: String,
    pub composite: f64,
    pub breakdown: SignalBreakdown,
}

#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    rows: Vec<ScoreTableRow>,
    pub skipped: Vec<SkippedSymbol>,
}

impl ScoreTable {
    /// Sorts by (date, symbol) and drops repeated (date, symbol) pairs,
    /// keeping the first.
    pub fn from_rows(mut rows: Vec<ScoreTableRow>) -> Self {
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.symbol.cmp(&b.symbol)));
        rows.dedup_by(|later, earlier| later.date == earlier.date && later.symbol == earlier.symbol);
        ScoreTable {
            rows,
            skipped: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[ScoreTableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows for exactly `date`, by symbol.
    pub fn rows_on(&self, date: NaiveDate) -> &[ScoreTableRow] {
        let lo = self.rows.partition_point(|r| r.date < date);
        let hi = self.rows.partition_point(|r| r.date <= date);
        &self.rows[lo..hi]
    }

    /// Earliest date with at least one row on or after `date`.
    pub fn first_date_on_or_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        let idx = self.rows.partition_point(|r| r.date < date);
        self.rows.get(idx).map(|r| r.date)
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.rows.iter().map(|r| r.date).collect();
        dates.dedup();
        dates
    }

    /// Rows ordered by composite descending; ties by date, then symbol.
    pub fn sorted_by_composite_desc(&self) -> Vec<&ScoreTableRow> {
        let mut sorted: Vec<&ScoreTableRow> = self.rows.iter().collect();
        sorted.sort_by(|a, b| {
            b.composite
                .total_cmp(&a.composite)
                .then_with(|| a.date.cmp(&b.date))
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        sorted
    }
}

/// Scores one instrument on every date of its history inside
/// `[start_date, end_date]` that has at least `MIN_SCORING_BARS` bars up to
/// and including it.
pub fn score_instrument(
    history: &PriceHistory,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<ScoreTableRow>, ScoreTraderError> {
    history.validate()?;

    let bars = history.bars();
    let first = bars.partition_point(|b| b.date < start_date);
    let last = bars.partition_point(|b| b.date <= end_date);
    let first = first.max(MIN_SCORING_BARS - 1);

    let rows = (first..last.max(first))
        .map(|i| {
            let prefix = &bars[..=i];
            let breakdown = score_prefix(prefix);
            ScoreTableRow {
                date: bars[i].date,
                symbol: history.symbol.clone(),
                composite: breakdown.composite(),
                breakdown,
            }
        })
        .collect();

    Ok(rows)
}

/// Builds the score table for every history.
///
/// A failing instrument is logged and listed in `skipped`; it never aborts
/// the build. `progress` is called once per finished instrument with the
/// symbol; with `parallel` it may be called from worker threads.
pub fn build_score_table<F>(
    histories: &[PriceHistory],
    start_date: NaiveDate,
    end_date: NaiveDate,
    parallel: bool,
    progress: F,
) -> ScoreTable
where
    F: Fn(&str) + Send + Sync,
{
    let score_one = |history: &PriceHistory| {
        let result = score_instrument(history, start_date, end_date);
        progress(&history.symbol);
        (history.symbol.clone(), result)
    };

    let results: Vec<(String, Result<Vec<ScoreTableRow>, ScoreTraderError>)> =
        run_per_instrument(histories, parallel, score_one);

    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    for (symbol, result) in results {
        match result {
            Ok(instrument_rows) => {
                debug!(symbol = %symbol, rows = instrument_rows.len(), "scored instrument");
                rows.extend(instrument_rows);
            }
            Err(err) => {
                warn!(symbol = %symbol, error = %err, "scoring failed, skipping instrument");
                let reason = SkipReason::from_error(err)
                    .unwrap_or_else(|other| SkipReason::Malformed(other.to_string()));
                skipped.push(SkippedSymbol { symbol, reason });
            }
        }
    }

    let mut table = ScoreTable::from_rows(rows);
    skipped.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    table.skipped = skipped;
    table
}

#[cfg(feature = "parallel")]
fn run_per_instrument<T, F>(histories: &[PriceHistory], parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&PriceHistory) -> T + Send + Sync,
{
    if parallel {
        histories.par_iter().map(&f).collect()
    } else {
        histories.iter().map(&f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_per_instrument<T, F>(histories: &[PriceHistory], _parallel: bool, f: F) -> Vec<T>
where
    F: Fn(&PriceHistory) -> T,
{
    histories.iter().map(&f).collect()
}
