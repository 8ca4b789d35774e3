//! Opportunity snapshot: every instrument scored as of one day.
//!
//! Rows carry the five sub-signals with their price hints, the composite,
//! recent price variation and market-cap information from the metadata
//! provider. A missing market cap stays `None`; it is never coerced to
//! "below threshold".

use crate::domain::composite::{score_prefix, SignalBreakdown};
use crate::domain::price::{price_variation, PriceHistory};
use crate::domain::score_table::MIN_SCORING_BARS;
use crate::ports::metadata_port::MetadataPort;
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityRow {
    pub symbol: String,
    pub date: NaiveDate,
    pub description: String,
    pub market_cap: Option<f64>,
    pub above_cap_threshold: Option<bool>,
    pub breakdown: SignalBreakdown,
    pub composite: f64,
    pub last_close: f64,
    pub variation_2w: Option<f64>,
    pub variation_6w: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct OpportunityReport {
    /// Requested day, or the latest bar date seen when none was given.
    pub as_of: Option<NaiveDate>,
    pub rows: Vec<OpportunityRow>,
}

impl OpportunityReport {
    /// First `n` rows whose market cap is known and at or above the
    /// threshold.
    pub fn top_above_threshold(&self, n: usize) -> Vec<&OpportunityRow> {
        self.rows
            .iter()
            .filter(|r| r.above_cap_threshold == Some(true))
            .take(n)
            .collect()
    }
}

/// `None` when the cap is unknown. A reported zero compares like any
/// other number.
pub fn above_cap_threshold(market_cap: Option<f64>, threshold: f64) -> Option<bool> {
    market_cap.map(|cap| cap >= threshold)
}

/// Scores each history on its prefix ending at `day` (or its last bar).
///
/// Instruments with fewer than `MIN_SCORING_BARS` bars in that prefix are
/// left out. Rows are sorted by composite descending, ties by symbol.
pub fn build_opportunities(
    histories: &[PriceHistory],
    metadata: &dyn MetadataPort,
    day: Option<NaiveDate>,
    cap_threshold: f64,
) -> OpportunityReport {
    let mut rows: Vec<OpportunityRow> = histories
        .iter()
        .filter_map(|history| {
            let prefix = match day {
                Some(day) => history.prefix(day),
                None => history.bars(),
            };
            if prefix.len() < MIN_SCORING_BARS {
                debug!(symbol = %history.symbol, bars = prefix.len(), "too little history for snapshot");
                return None;
            }
            let last = prefix.last()?;
            let breakdown = score_prefix(prefix);
            let market_cap = metadata.market_cap(&history.symbol);

            Some(OpportunityRow {
                symbol: history.symbol.clone(),
                date: last.date,
                description: metadata.describe(&history.symbol).as_str().to_string(),
                market_cap,
                above_cap_threshold: above_cap_threshold(market_cap, cap_threshold),
                composite: breakdown.composite(),
                breakdown,
                last_close: last.close,
                variation_2w: price_variation(prefix, 2),
                variation_6w: price_variation(prefix, 6),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.composite
            .total_cmp(&a.composite)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    let as_of = day.or_else(|| histories.iter().filter_map(|h| h.last_date()).max());

    OpportunityReport { as_of, rows }
}
