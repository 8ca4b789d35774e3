//! CSV report writer.
//!
//! Produces three artifacts inside one output directory:
//! - `score_table.csv`: every (date, symbol) row, highest composite first
//! - `ledger.csv`: the simulator's ledger in chronological order
//! - `<as_of>_indicators_analysis.csv`: the opportunity snapshot

use crate::domain::composite::SignalBreakdown;
use crate::domain::error::ScoreTraderError;
use crate::domain::ledger::Ledger;
use crate::domain::opportunity::OpportunityReport;
use crate::domain::score_table::ScoreTable;
use crate::domain::signal::Signal;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SCORE_TABLE_FILE: &str = "score_table.csv";
pub const LEDGER_FILE: &str = "ledger.csv";

pub struct CsvReportAdapter {
    out_dir: PathBuf,
}

#[derive(Serialize)]
struct ScoreRecord<'a> {
    date: NaiveDate,
    symbol: &'a str,
    composite: f64,
    ema_score: u8,
    ema_entry: Option<f64>,
    ema_exit: Option<f64>,
    rsi_score: u8,
    rsi_entry: Option<f64>,
    rsi_exit: Option<f64>,
    adx_score: u8,
    adx_entry: Option<f64>,
    adx_exit: Option<f64>,
    donchian_score: u8,
    donchian_entry: Option<f64>,
    donchian_exit: Option<f64>,
    volume_score: u8,
    volume_entry: Option<f64>,
    volume_exit: Option<f64>,
}

#[derive(Serialize)]
struct OpportunityRecord<'a> {
    #[serde(rename = "Symbol")]
    symbol: &'a str,
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Market Cap")]
    market_cap: Option<f64>,
    #[serde(rename = "Above Cap Threshold")]
    above_cap_threshold: Option<bool>,
    #[serde(rename = "EMA Score")]
    ema_score: u8,
    #[serde(rename = "RSI Score")]
    rsi_score: u8,
    #[serde(rename = "ADX Score")]
    adx_score: u8,
    #[serde(rename = "Donchian Score")]
    donchian_score: u8,
    #[serde(rename = "Volume Score")]
    volume_score: u8,
    #[serde(rename = "Total Score")]
    composite: f64,
    #[serde(rename = "Last Close")]
    last_close: f64,
    #[serde(rename = "2W Variation %")]
    variation_2w: Option<f64>,
    #[serde(rename = "6W Variation %")]
    variation_6w: Option<f64>,
}

fn hints(signal: &Signal) -> (u8, Option<f64>, Option<f64>) {
    (signal.score.value(), signal.entry_price(), signal.exit_price())
}

impl<'a> ScoreRecord<'a> {
    fn new(date: NaiveDate, symbol: &'a str, composite: f64, b: &SignalBreakdown) -> Self {
        let (ema_score, ema_entry, ema_exit) = hints(&b.ema);
        let (rsi_score, rsi_entry, rsi_exit) = hints(&b.rsi);
        let (adx_score, adx_entry, adx_exit) = hints(&b.adx);
        let (donchian_score, donchian_entry, donchian_exit) = hints(&b.donchian);
        let (volume_score, volume_entry, volume_exit) = hints(&b.volume);
        ScoreRecord {
            date,
            symbol,
            composite,
            ema_score,
            ema_entry,
            ema_exit,
            rsi_score,
            rsi_entry,
            rsi_exit,
            adx_score,
            adx_entry,
            adx_exit,
            donchian_score,
            donchian_entry,
            donchian_exit,
            volume_score,
            volume_entry,
            volume_exit,
        }
    }
}

impl CsvReportAdapter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn analysis_file_name(as_of: Option<NaiveDate>) -> String {
        match as_of {
            Some(date) => format!("{}_indicators_analysis.csv", date.format("%Y-%m-%d")),
            None => "indicators_analysis.csv".to_string(),
        }
    }

    fn write_records<I, T>(&self, file_name: &str, records: I) -> Result<PathBuf, ScoreTraderError>
    where
        I: IntoIterator<Item = T>,
        T: Serialize,
    {
        let report_err = |reason: String| ScoreTraderError::Report {
            reason: format!("{file_name}: {reason}"),
        };

        fs::create_dir_all(&self.out_dir).map_err(|e| ScoreTraderError::Report {
            reason: format!("failed to create {}: {e}", self.out_dir.display()),
        })?;

        let path = self.out_dir.join(file_name);
        let mut writer = csv::Writer::from_path(&path).map_err(|e| report_err(e.to_string()))?;
        let mut count = 0usize;
        for record in records {
            writer.serialize(record).map_err(|e| report_err(e.to_string()))?;
            count += 1;
        }
        writer.flush().map_err(|e| report_err(e.to_string()))?;

        info!(path = %path.display(), rows = count, "report written");
        Ok(path)
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_score_table(&self, table: &ScoreTable) -> Result<PathBuf, ScoreTraderError> {
        let records = table
            .sorted_by_composite_desc()
            .into_iter()
            .map(|row| ScoreRecord::new(row.date, &row.symbol, row.composite, &row.breakdown));
        self.write_records(SCORE_TABLE_FILE, records)
    }

    fn write_ledger(&self, ledger: &Ledger) -> Result<PathBuf, ScoreTraderError> {
        self.write_records(LEDGER_FILE, ledger.entries())
    }

    fn write_opportunities(&self, report: &OpportunityReport) -> Result<PathBuf, ScoreTraderError> {
        let records = report.rows.iter().map(|row| OpportunityRecord {
            symbol: &row.symbol,
            date: row.date,
            description: &row.description,
            market_cap: row.market_cap,
            above_cap_threshold: row.above_cap_threshold,
            ema_score: row.breakdown.ema.score.value(),
            rsi_score: row.breakdown.rsi.score.value(),
            adx_score: row.breakdown.adx.score.value(),
            donchian_score: row.breakdown.donchian.score.value(),
            volume_score: row.breakdown.volume.score.value(),
            composite: row.composite,
            last_close: row.last_close,
            variation_2w: row.variation_2w,
            variation_6w: row.variation_6w,
        });
        self.write_records(&Self::analysis_file_name(report.as_of), records)
    }
}
