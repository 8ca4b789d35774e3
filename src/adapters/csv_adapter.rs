//! CSV price-file adapter: one `<SYMBOL>.csv` per instrument.
//!
//! Columns are found by header name (case-insensitive): Date, Open, High,
//! Low, Close and optionally Volume. Dates may carry a time suffix
//! (`2024-01-02 00:00:00-05:00`); only the leading `YYYY-MM-DD` is used.
//! Rows whose price cells are blank are dropped.

use crate::domain::error::ScoreTraderError;
use crate::domain::price::{PriceBar, PriceHistory};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn locate(symbol: &str, headers: &csv::StringRecord) -> Result<Self, ScoreTraderError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| ScoreTraderError::MalformedData {
                symbol: symbol.to_string(),
                reason: format!("missing {name} column"),
            })
        };

        Ok(Columns {
            date: require("Date")?,
            open: require("Open")?,
            high: require("High")?,
            low: require("Low")?,
            close: require("Close")?,
            volume: find("Volume"),
        })
    }
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }

    fn parse_date(symbol: &str, raw: &str) -> Result<NaiveDate, ScoreTraderError> {
        let raw = raw.trim();
        let head = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|e| ScoreTraderError::MalformedData {
            symbol: symbol.to_string(),
            reason: format!("invalid date '{raw}': {e}"),
        })
    }

    fn parse_value(symbol: &str, name: &str, raw: &str) -> Result<f64, ScoreTraderError> {
        raw.trim()
            .parse::<f64>()
            .map_err(|e| ScoreTraderError::MalformedData {
                symbol: symbol.to_string(),
                reason: format!("invalid {name} value '{raw}': {e}"),
            })
    }

    fn parse_bars(symbol: &str, content: &str) -> Result<Vec<PriceBar>, ScoreTraderError> {
        let malformed = |e: csv::Error| ScoreTraderError::MalformedData {
            symbol: symbol.to_string(),
            reason: format!("CSV parse error: {e}"),
        };

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let columns = Columns::locate(symbol, &rdr.headers().map_err(malformed)?.clone())?;

        let mut bars = Vec::new();
        let mut blank = 0usize;

        for result in rdr.records() {
            let record = result.map_err(malformed)?;
            let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

            let prices = [
                cell(columns.open),
                cell(columns.high),
                cell(columns.low),
                cell(columns.close),
            ];
            if prices.iter().any(|p| p.is_empty()) {
                blank += 1;
                continue;
            }

            let volume = match columns.volume.map(cell) {
                Some(raw) if !raw.is_empty() => Self::parse_value(symbol, "Volume", raw)?,
                _ => 0.0,
            };

            bars.push(PriceBar {
                date: Self::parse_date(symbol, cell(columns.date))?,
                open: Self::parse_value(symbol, "Open", prices[0])?,
                high: Self::parse_value(symbol, "High", prices[1])?,
                low: Self::parse_value(symbol, "Low", prices[2])?,
                close: Self::parse_value(symbol, "Close", prices[3])?,
                volume,
            });
        }

        if blank > 0 {
            debug!(symbol, rows = blank, "dropped rows with blank prices");
        }
        Ok(bars)
    }
}

impl PricePort for CsvPriceAdapter {
    fn fetch_history(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceHistory, ScoreTraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::NotFound => format!("{} not found", path.display()),
                _ => format!("failed to read {}: {}", path.display(), e),
            };
            ScoreTraderError::DataUnavailable {
                symbol: symbol.to_string(),
                reason,
            }
        })?;

        let bars = Self::parse_bars(symbol, &content)?;
        Ok(PriceHistory::new(symbol, bars)?.clipped(start_date, end_date))
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScoreTraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ScoreTraderError::DataUnavailable {
            symbol: "*".to_string(),
            reason: format!("failed to read directory {}: {}", self.base_path.display(), e),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(".csv") {
                if !symbol.is_empty() {
                    symbols.push(symbol.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
