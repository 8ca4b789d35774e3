//! Instrument universe: symbol list parsing and history loading.
//!
//! Loading never fails because of one instrument. Unavailable or malformed
//! histories are logged, recorded as skipped, and the rest carry on; only an
//! empty result is an error.

use crate::domain::error::ScoreTraderError;
use crate::domain::price::PriceHistory;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Splits a comma list into upper-cased symbols.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Unavailable(String),
    Malformed(String),
    NoBarsInRange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unavailable(reason) => write!(f, "unavailable: {reason}"),
            SkipReason::Malformed(reason) => write!(f, "malformed: {reason}"),
            SkipReason::NoBarsInRange => f.write_str("no bars in requested range"),
        }
    }
}

impl SkipReason {
    /// Maps a per-instrument error to a skip reason. Other errors are not
    /// skippable and come back unchanged.
    pub fn from_error(err: ScoreTraderError) -> Result<SkipReason, ScoreTraderError> {
        match err {
            ScoreTraderError::DataUnavailable { reason, .. } => Ok(SkipReason::Unavailable(reason)),
            ScoreTraderError::MalformedData { reason, .. } => Ok(SkipReason::Malformed(reason)),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct Universe {
    pub histories: Vec<PriceHistory>,
    pub skipped: Vec<SkippedSymbol>,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.histories.len()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.histories.iter().map(|h| h.symbol.as_str()).collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceHistory> {
        self.histories.iter().find(|h| h.symbol == symbol)
    }
}

/// Loads every symbol's history up to `end_date`.
///
/// Bars before `start_date` are kept as warm-up for the analyzers; a symbol
/// with no bar at all inside `[start_date, end_date]` is skipped.
pub fn load_universe(
    port: &dyn PricePort,
    symbols: &[String],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Universe, ScoreTraderError> {
    if symbols.is_empty() {
        return Err(ScoreTraderError::EmptyUniverse);
    }

    let mut histories = Vec::new();
    let mut skipped = Vec::new();

    for symbol in symbols {
        let loaded = port
            .fetch_history(symbol, None, end_date)
            .and_then(|history| history.validate().map(|()| history));

        let reason = match loaded {
            Ok(history) => {
                let in_range = history.range(
                    start_date.unwrap_or(NaiveDate::MIN),
                    end_date.unwrap_or(NaiveDate::MAX),
                );
                if in_range.is_empty() {
                    SkipReason::NoBarsInRange
                } else {
                    info!(symbol = %symbol, bars = history.len(), "loaded price history");
                    histories.push(history);
                    continue;
                }
            }
            Err(err) => SkipReason::from_error(err)?,
        };

        warn!(symbol = %symbol, reason = %reason, "skipping instrument");
        skipped.push(SkippedSymbol {
            symbol: symbol.clone(),
            reason,
        });
    }

    if histories.is_empty() {
        return Err(ScoreTraderError::EmptyUniverse);
    }

    if !skipped.is_empty() {
        info!(
            loaded = histories.len(),
            requested = symbols.len(),
            "universe loaded with skips"
        );
    }

    Ok(Universe { histories, skipped })
}
