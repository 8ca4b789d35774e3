//! Indicator analyzers.
//!
//! Each analyzer reduces a price prefix (every bar up to and including the
//! evaluation date) to a [`Signal`]. Below an analyzer's minimum history the
//! result is always [`Signal::neutral`].
//!
//! All "last bar vs. previous bar" checks go through
//! [`IndicatorSeries::valid_from_end`](crate::domain::indicator::IndicatorSeries::valid_from_end)
//! on a series computed over the prefix, so a warm-up point behaves like a
//! missing value and any comparison against it is false.

pub mod adx_trend;
pub mod donchian_breakout;
pub mod ema_cross;
pub mod rsi_momentum;
pub mod volume_confirmation;

use crate::domain::price::PriceBar;
use crate::domain::signal::Signal;
use std::fmt;

/// The five analyzers, in the order their scores appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Analyzer {
    Ema,
    Rsi,
    Adx,
    Donchian,
    Volume,
}

impl Analyzer {
    pub const ALL: [Analyzer; 5] = [
        Analyzer::Ema,
        Analyzer::Rsi,
        Analyzer::Adx,
        Analyzer::Donchian,
        Analyzer::Volume,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Analyzer::Ema => "ema",
            Analyzer::Rsi => "rsi",
            Analyzer::Adx => "adx",
            Analyzer::Donchian => "donchian",
            Analyzer::Volume => "volume",
        }
    }

    pub fn min_bars(self) -> usize {
        match self {
            Analyzer::Ema => ema_cross::MIN_BARS,
            Analyzer::Rsi => rsi_momentum::MIN_BARS,
            Analyzer::Adx => adx_trend::MIN_BARS,
            Analyzer::Donchian => donchian_breakout::MIN_BARS,
            Analyzer::Volume => volume_confirmation::MIN_BARS,
        }
    }

    pub fn analyze(self, bars: &[PriceBar]) -> Signal {
        if bars.len() < self.min_bars() {
            return Signal::neutral();
        }
        match self {
            Analyzer::Ema => ema_cross::analyze_ema(bars),
            Analyzer::Rsi => rsi_momentum::analyze_rsi(bars),
            Analyzer::Adx => adx_trend::analyze_adx(bars),
            Analyzer::Donchian => donchian_breakout::analyze_donchian(bars),
            Analyzer::Volume => volume_confirmation::analyze_volume(bars),
        }
    }
}

impl fmt::Display for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Latest and previous close of a prefix.
pub(crate) fn last_two_closes(bars: &[PriceBar]) -> Option<(f64, f64)> {
    match bars {
        [.., prev, last] => Some((last.close, prev.close)),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::price::PriceBar;
    use chrono::{Duration, NaiveDate};

    pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
        let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: base + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: (close - 1.0).max(0.0),
                close,
                volume: 1_000.0,
            })
            .collect()
    }

    pub fn flat(count: usize, price: f64) -> Vec<PriceBar> {
        bars_from_closes(&vec![price; count])
    }
}
