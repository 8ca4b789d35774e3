//! Composite score: unweighted mean of the five analyzer scores.

use crate::domain::analysis::Analyzer;
use crate::domain::price::PriceBar;
use crate::domain::signal::Signal;

/// Per-analyzer signals for one instrument on one date, in `Analyzer::ALL`
/// order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalBreakdown {
    pub ema: Signal,
    pub rsi: Signal,
    pub adx: Signal,
    pub donchian: Signal,
    pub volume: Signal,
}

impl SignalBreakdown {
    pub fn get(&self, analyzer: Analyzer) -> &Signal {
        match analyzer {
            Analyzer::Ema => &self.ema,
            Analyzer::Rsi => &self.rsi,
            Analyzer::Adx => &self.adx,
            Analyzer::Donchian => &self.donchian,
            Analyzer::Volume => &self.volume,
        }
    }

    pub fn signals(&self) -> [Signal; 5] {
        [self.ema, self.rsi, self.adx, self.donchian, self.volume]
    }

    pub fn composite(&self) -> f64 {
        composite_score(&self.signals())
    }
}

/// Arithmetic mean of the signal scores. An empty slice scores neutral.
pub fn composite_score(signals: &[Signal]) -> f64 {
    if signals.is_empty() {
        return 3.0;
    }
    let total: u32 = signals.iter().map(|s| u32::from(s.score.value())).sum();
    f64::from(total) / signals.len() as f64
}

/// Runs every analyzer on a prefix ending at the evaluation date.
pub fn score_prefix(bars: &[PriceBar]) -> SignalBreakdown {
    SignalBreakdown {
        ema: Analyzer::Ema.analyze(bars),
        rsi: Analyzer::Rsi.analyze(bars),
        adx: Analyzer::Adx.analyze(bars),
        donchian: Analyzer::Donchian.analyze(bars),
        volume: Analyzer::Volume.analyze(bars),
    }
}
