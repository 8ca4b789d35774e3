//! Daily price bars and per-instrument price histories.
//!
//! A `PriceHistory` is loaded once per instrument and is read-only afterwards.
//! Analyzers never index it from the end; they ask for a prefix ending at the
//! evaluation date and look at the tail of that slice.

use crate::domain::error::ScoreTraderError;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    fn is_well_formed(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

#[derive(Debug, Clone)]
pub struct PriceHistory {
    pub symbol: String,
    bars: Vec<PriceBar>,
    date_index: HashMap<NaiveDate, usize>,
}

impl PriceHistory {
    /// Builds a history sorted by date. Duplicate dates are rejected.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Result<Self, ScoreTraderError> {
        let symbol = symbol.into();
        bars.sort_by_key(|b| b.date);

        if let Some(dup) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(ScoreTraderError::MalformedData {
                symbol,
                reason: format!("duplicate bar for {}", dup[0].date),
            });
        }

        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();

        Ok(Self {
            symbol,
            bars,
            date_index,
        })
    }

    /// Rejects non-finite or negative prices and volumes.
    pub fn validate(&self) -> Result<(), ScoreTraderError> {
        match self.bars.iter().find(|b| !b.is_well_formed()) {
            Some(bar) => Err(ScoreTraderError::MalformedData {
                symbol: self.symbol.clone(),
                reason: format!("non-finite or negative value on {}", bar.date),
            }),
            None => Ok(()),
        }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn get_bar(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.date_index.get(&date).map(|&i| &self.bars[i])
    }

    /// Most recent bar dated on or before `date`.
    pub fn bar_at_or_before(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.prefix(date).last()
    }

    /// All bars up to and including `date`.
    pub fn prefix(&self, date: NaiveDate) -> &[PriceBar] {
        let end = self.bars.partition_point(|b| b.date <= date);
        &self.bars[..end]
    }

    /// Bars with `start <= date <= end`.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> &[PriceBar] {
        if end < start {
            return &[];
        }
        let lo = self.bars.partition_point(|b| b.date < start);
        let hi = self.bars.partition_point(|b| b.date <= end);
        &self.bars[lo..hi]
    }

    /// Copy restricted to `[start, end]`; either bound may be open.
    pub fn clipped(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> PriceHistory {
        let start = start.unwrap_or(NaiveDate::MIN);
        let end = end.unwrap_or(NaiveDate::MAX);
        let bars = self.range(start, end).to_vec();
        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();
        PriceHistory {
            symbol: self.symbol.clone(),
            bars,
            date_index,
        }
    }
}

/// Percent change of the latest close against the last close at least
/// `weeks` weeks older.
pub fn price_variation(bars: &[PriceBar], weeks: i64) -> Option<f64> {
    let latest = bars.last()?;
    let cutoff = latest.date - Duration::weeks(weeks);
    let end = bars.partition_point(|b| b.date <= cutoff);
    let reference = bars[..end].last()?;
    if reference.close == 0.0 {
        return None;
    }
    Some((latest.close - reference.close) / reference.close * 100.0)
}
