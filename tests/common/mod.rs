#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use scoretrader::domain::backtest::BacktestConfig;
use scoretrader::domain::error::ScoreTraderError;
use scoretrader::domain::ledger::Ledger;
use scoretrader::domain::opportunity::OpportunityReport;
pub use scoretrader::domain::price::{PriceBar, PriceHistory};
use scoretrader::domain::score_table::ScoreTable;
use scoretrader::ports::metadata_port::{Description, MetadataPort};
use scoretrader::ports::price_port::PricePort;
use scoretrader::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_history(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceHistory, ScoreTraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScoreTraderError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(symbol)
            .cloned()
            .ok_or_else(|| ScoreTraderError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "not in mock".into(),
            })?;
        Ok(PriceHistory::new(symbol, bars)?.clipped(start_date, end_date))
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScoreTraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub struct StubMetadata {
    pub descriptions: HashMap<String, String>,
    pub caps: HashMap<String, f64>,
}

impl StubMetadata {
    pub fn new() -> Self {
        Self {
            descriptions: HashMap::new(),
            caps: HashMap::new(),
        }
    }

    pub fn with(mut self, symbol: &str, description: &str, cap: Option<f64>) -> Self {
        self.descriptions
            .insert(symbol.to_string(), description.to_string());
        if let Some(cap) = cap {
            self.caps.insert(symbol.to_string(), cap);
        }
        self
    }
}

impl MetadataPort for StubMetadata {
    fn describe(&self, symbol: &str) -> Description {
        match self.descriptions.get(symbol) {
            Some(d) => Description::Known(d.clone()),
            None => Description::Unknown,
        }
    }

    fn market_cap(&self, symbol: &str) -> Option<f64> {
        self.caps.get(symbol).copied()
    }
}

/// Keeps copies of everything written instead of touching disk.
pub struct RecordingReportPort {
    pub tables: RefCell<Vec<ScoreTable>>,
    pub ledgers: RefCell<Vec<Ledger>>,
    pub reports: RefCell<Vec<OpportunityReport>>,
}

impl RecordingReportPort {
    pub fn new() -> Self {
        Self {
            tables: RefCell::new(Vec::new()),
            ledgers: RefCell::new(Vec::new()),
            reports: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for RecordingReportPort {
    fn write_score_table(&self, table: &ScoreTable) -> Result<PathBuf, ScoreTraderError> {
        self.tables.borrow_mut().push(table.clone());
        Ok(PathBuf::from("score_table.csv"))
    }

    fn write_ledger(&self, ledger: &Ledger) -> Result<PathBuf, ScoreTraderError> {
        self.ledgers.borrow_mut().push(ledger.clone());
        Ok(PathBuf::from("ledger.csv"))
    }

    fn write_opportunities(&self, report: &OpportunityReport) -> Result<PathBuf, ScoreTraderError> {
        self.reports.borrow_mut().push(report.clone());
        Ok(PathBuf::from("analysis.csv"))
    }
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn bar(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> PriceBar {
    PriceBar {
        date,
        open,
        high,
        low,
        close,
        volume,
    }
}

/// One bar per calendar day, open = close, high/low one point either side.
pub fn bars_from_closes(start: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = d(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            bar(
                start + Duration::days(i as i64),
                close,
                close + 1.0,
                (close - 1.0).max(0.0),
                close,
                1_000.0,
            )
        })
        .collect()
}

pub fn flat_bars(start: &str, count: usize, price: f64) -> Vec<PriceBar> {
    bars_from_closes(start, &vec![price; count])
}

/// Smooth oscillation with a drift; exercises every analyzer branch over
/// a long enough run.
pub fn wave_bars(start: &str, count: usize, base: f64, phase: f64) -> Vec<PriceBar> {
    let start = d(start);
    (0..count)
        .map(|i| {
            let t = i as f64;
            let close = base + 0.05 * t + 8.0 * ((t + phase) / 9.0).sin();
            let open = close - 0.5 * ((t + phase) / 4.0).cos();
            bar(
                start + Duration::days(i as i64),
                open,
                close.max(open) + 1.0,
                close.min(open) - 1.0,
                close,
                1_000.0 + 400.0 * ((t + phase) / 5.0).sin().abs(),
            )
        })
        .collect()
}

pub fn history(symbol: &str, bars: Vec<PriceBar>) -> PriceHistory {
    PriceHistory::new(symbol, bars).unwrap()
}

pub fn backtest_config(start: &str, end: &str) -> BacktestConfig {
    BacktestConfig {
        start_date: d(start),
        end_date: d(end),
        initial_capital: 50_000.0,
        stop_loss_fraction: 0.05,
        reevaluation_days: 14,
    }
}

pub fn write_price_csv(dir: &Path, symbol: &str, bars: &[PriceBar]) {
    let mut content = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.close, b.volume
        ));
    }
    fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
