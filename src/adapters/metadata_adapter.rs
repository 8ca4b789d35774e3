//! File-backed instrument metadata.
//!
//! Descriptions come from a tab-separated file whose first line is a header
//! and whose rows are `SYMBOL<TAB>description`. Market caps come from an
//! optional fundamentals CSV with `Symbol` and `Market Cap` columns.

use crate::domain::error::ScoreTraderError;
use crate::ports::metadata_port::{Description, MetadataPort};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default)]
pub struct FileMetadataAdapter {
    descriptions: HashMap<String, String>,
    market_caps: HashMap<String, f64>,
}

impl FileMetadataAdapter {
    /// Adapter with no data: every symbol is unknown.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_files(
        description_file: Option<&Path>,
        fundamentals_file: Option<&Path>,
    ) -> Result<Self, ScoreTraderError> {
        let descriptions = match description_file {
            Some(path) => Self::parse_descriptions(&read(path, "description_file")?),
            None => HashMap::new(),
        };
        let market_caps = match fundamentals_file {
            Some(path) => Self::parse_fundamentals(&read(path, "fundamentals_file")?)?,
            None => HashMap::new(),
        };
        debug!(
            descriptions = descriptions.len(),
            market_caps = market_caps.len(),
            "loaded instrument metadata"
        );
        Ok(Self {
            descriptions,
            market_caps,
        })
    }

    fn parse_descriptions(content: &str) -> HashMap<String, String> {
        content
            .lines()
            .skip(1)
            .filter_map(|line| {
                let (symbol, description) = line.trim_end().split_once('\t')?;
                let symbol = symbol.trim();
                let description = description.trim();
                if symbol.is_empty() || description.is_empty() {
                    return None;
                }
                Some((symbol.to_uppercase(), description.to_string()))
            })
            .collect()
    }

    fn parse_fundamentals(content: &str) -> Result<HashMap<String, f64>, ScoreTraderError> {
        let bad_file = |reason: String| invalid("fundamentals_file", reason);

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| bad_file(e.to_string()))?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| bad_file(format!("missing {name} column")))
        };
        let symbol_col = column("Symbol")?;
        let cap_col = column("Market Cap")?;

        let mut caps = HashMap::new();
        for record in rdr.records() {
            let record = record.map_err(|e| bad_file(e.to_string()))?;
            let symbol = record.get(symbol_col).unwrap_or("").trim();
            if symbol.is_empty() {
                continue;
            }
            // blank or unparseable caps stay unknown
            let Some(cap) = record
                .get(cap_col)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|cap| cap.is_finite())
            else {
                continue;
            };
            caps.entry(symbol.to_uppercase()).or_insert(cap);
        }
        Ok(caps)
    }
}

fn invalid(key: &str, reason: String) -> ScoreTraderError {
    ScoreTraderError::ConfigInvalid {
        section: "data".to_string(),
        key: key.to_string(),
        reason,
    }
}

fn read(path: &Path, key: &str) -> Result<String, ScoreTraderError> {
    fs::read_to_string(path).map_err(|e| invalid(key, format!("failed to read {}: {e}", path.display())))
}

impl MetadataPort for FileMetadataAdapter {
    fn describe(&self, symbol: &str) -> Description {
        match self.descriptions.get(symbol) {
            Some(text) => Description::Known(text.clone()),
            None => Description::Unknown,
        }
    }

    fn market_cap(&self, symbol: &str) -> Option<f64> {
        self.market_caps.get(symbol).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_files() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("nasdaq.txt"),
            "Symbol\tSecurity Name\n\
             AAPL\tApple Inc. - Common Stock\n\
             MSFT\tMicrosoft Corporation\tClass A\n\
             NOTAB\n\
             \n",
        )
        .unwrap();
        fs::write(
            dir.path().join("fundamentals.csv"),
            "Symbol,Name,Market Cap\n\
             AAPL,Apple,2950000000000\n\
             TINY,Tiny Co,0\n\
             BLANK,Blank Co,\n\
             TEXT,Text Co,n/a\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn descriptions_split_on_first_tab() {
        let dir = write_files();
        let adapter = FileMetadataAdapter::from_files(Some(&dir.path().join("nasdaq.txt")), None).unwrap();

        assert_eq!(
            adapter.describe("AAPL"),
            Description::Known("Apple Inc. - Common Stock".into())
        );
        assert_eq!(
            adapter.describe("MSFT"),
            Description::Known("Microsoft Corporation\tClass A".into())
        );
        assert_eq!(adapter.describe("NOTAB"), Description::Unknown);
        // header line is not data
        assert_eq!(adapter.describe("Symbol"), Description::Unknown);
        assert_eq!(adapter.describe("ZZZ").as_str(), "No description available");
    }

    #[test]
    fn market_caps_known_zero_and_unknown() {
        let dir = write_files();
        let adapter =
            FileMetadataAdapter::from_files(None, Some(&dir.path().join("fundamentals.csv"))).unwrap();

        assert_eq!(adapter.market_cap("AAPL"), Some(2.95e12));
        assert_eq!(adapter.market_cap("TINY"), Some(0.0));
        assert_eq!(adapter.market_cap("BLANK"), None);
        assert_eq!(adapter.market_cap("TEXT"), None);
        assert_eq!(adapter.market_cap("MISSING"), None);
    }

    #[test]
    fn fundamentals_without_cap_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "Symbol,Name\nAAPL,Apple\n").unwrap();
        let result = FileMetadataAdapter::from_files(None, Some(&path));
        assert!(matches!(
            result,
            Err(ScoreTraderError::ConfigInvalid { key, reason, .. })
                if key == "fundamentals_file" && reason.contains("Market Cap")
        ));
    }

    #[test]
    fn missing_description_file() {
        let result = FileMetadataAdapter::from_files(Some(Path::new("/nonexistent/nasdaq.txt")), None);
        assert!(matches!(
            result,
            Err(ScoreTraderError::ConfigInvalid { key, .. }) if key == "description_file"
        ));
    }

    #[test]
    fn empty_adapter_knows_nothing() {
        let adapter = FileMetadataAdapter::empty();
        assert_eq!(adapter.describe("AAPL"), Description::Unknown);
        assert_eq!(adapter.market_cap("AAPL"), None);
    }
}
