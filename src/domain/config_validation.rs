//! Configuration loading and validation.
//!
//! This is the only fatal path of a run: everything here is checked before
//! any per-instrument work begins.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::ScoreTraderError;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 50_000.0;
pub const DEFAULT_STOP_LOSS: f64 = 0.05;
pub const DEFAULT_REEVALUATION_DAYS: i64 = 14;
pub const DEFAULT_CAP_THRESHOLD: f64 = 1_000_000_000.0;
pub const DEFAULT_TOP_N: i64 = 10;

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> ScoreTraderError {
    ScoreTraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Parses a YYYY-MM-DD value, naming the offending key on failure.
pub fn parse_date(value: &str, section: &str, key: &str) -> Result<NaiveDate, ScoreTraderError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(section, key, format!("invalid {key} format, expected YYYY-MM-DD")))
}

fn required_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, ScoreTraderError> {
    match config.get_string("backtest", key) {
        Some(value) => parse_date(&value, "backtest", key),
        None => Err(ScoreTraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        }),
    }
}

/// Reads `[backtest]` into a `BacktestConfig` without range checks.
pub fn load_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, ScoreTraderError> {
    let start_date = required_date(config, "start_date")?;
    let end_date = required_date(config, "end_date")?;

    let days = config.get_int("backtest", "reevaluation_days", DEFAULT_REEVALUATION_DAYS);
    let reevaluation_days = u32::try_from(days)
        .map_err(|_| invalid("backtest", "reevaluation_days", "reevaluation_days must be positive"))?;

    Ok(BacktestConfig {
        start_date,
        end_date,
        initial_capital: config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        stop_loss_fraction: config.get_double("backtest", "stop_loss", DEFAULT_STOP_LOSS),
        reevaluation_days,
    })
}

/// Range checks on a resolved config (after command-line overrides).
pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), ScoreTraderError> {
    if !(config.initial_capital > 0.0 && config.initial_capital.is_finite()) {
        return Err(invalid("backtest", "initial_capital", "initial_capital must be positive"));
    }
    if !(config.stop_loss_fraction > 0.0 && config.stop_loss_fraction < 1.0) {
        return Err(invalid("backtest", "stop_loss", "stop_loss must be between 0 and 1"));
    }
    if config.reevaluation_days == 0 {
        return Err(invalid(
            "backtest",
            "reevaluation_days",
            "reevaluation_days must be positive",
        ));
    }
    if config.start_date >= config.end_date {
        return Err(invalid("backtest", "start_date", "start_date must be before end_date"));
    }
    Ok(())
}

/// `[data]`: a price directory is required; an explicit symbol list must
/// parse.
pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), ScoreTraderError> {
    match config.get_string("data", "price_dir") {
        Some(dir) if !dir.trim().is_empty() => {}
        _ => {
            return Err(ScoreTraderError::ConfigMissing {
                section: "data".to_string(),
                key: "price_dir".to_string(),
            });
        }
    }
    if let Some(list) = config.get_string("data", "symbols") {
        parse_symbols(&list).map_err(|e| invalid("data", "symbols", e.to_string()))?;
    }
    Ok(())
}

/// `[analysis]` settings for the opportunity snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub cap_threshold: f64,
    pub top_n: usize,
}

pub fn load_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, ScoreTraderError> {
    let cap_threshold = config.get_double("analysis", "cap_threshold", DEFAULT_CAP_THRESHOLD);
    if !cap_threshold.is_finite() || cap_threshold < 0.0 {
        return Err(invalid("analysis", "cap_threshold", "cap_threshold must be non-negative"));
    }
    let top_n = config.get_int("analysis", "top_n", DEFAULT_TOP_N);
    let top_n = usize::try_from(top_n)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| invalid("analysis", "top_n", "top_n must be at least 1"))?;
    Ok(AnalysisConfig {
        cap_threshold,
        top_n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = "\
[data]
price_dir = data/prices
symbols = AAPL,MSFT

[backtest]
start_date = 2023-01-01
end_date = 2023-12-31
";

    fn loaded(content: &str) -> Result<BacktestConfig, ScoreTraderError> {
        let config = load_backtest_config(&make_config(content))?;
        validate_backtest_config(&config)?;
        Ok(config)
    }

    fn assert_invalid_key(result: Result<impl std::fmt::Debug, ScoreTraderError>, expected: &str) {
        match result {
            Err(ScoreTraderError::ConfigInvalid { key, .. }) => assert_eq!(key, expected),
            other => panic!("expected ConfigInvalid for {expected}, got {other:?}"),
        }
    }

    mod backtest {
        use super::*;

        #[test]
        fn defaults_applied() {
            let c = loaded(VALID).unwrap();
            assert_eq!(c.initial_capital, 50_000.0);
            assert_eq!(c.stop_loss_fraction, 0.05);
            assert_eq!(c.reevaluation_days, 14);
            assert_eq!(c.start_date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        }

        #[test]
        fn explicit_values() {
            let c = loaded(
                "[backtest]\nstart_date = 2023-01-01\nend_date = 2023-06-01\n\
                 initial_capital = 1000\nstop_loss = 0.1\nreevaluation_days = 7\n",
            )
            .unwrap();
            assert_eq!(c.initial_capital, 1000.0);
            assert_eq!(c.stop_loss_fraction, 0.1);
            assert_eq!(c.reevaluation_days, 7);
        }

        #[test]
        fn capital_must_be_positive() {
            let r = loaded("[backtest]\nstart_date = 2023-01-01\nend_date = 2023-06-01\ninitial_capital = 0\n");
            assert_invalid_key(r, "initial_capital");
        }

        #[test]
        fn stop_loss_range() {
            for bad in ["0", "1", "-0.1", "1.5"] {
                let r = loaded(&format!(
                    "[backtest]\nstart_date = 2023-01-01\nend_date = 2023-06-01\nstop_loss = {bad}\n"
                ));
                assert_invalid_key(r, "stop_loss");
            }
        }

        #[test]
        fn reevaluation_days_positive() {
            for bad in ["0", "-3"] {
                let r = loaded(&format!(
                    "[backtest]\nstart_date = 2023-01-01\nend_date = 2023-06-01\nreevaluation_days = {bad}\n"
                ));
                assert_invalid_key(r, "reevaluation_days");
            }
        }

        #[test]
        fn start_must_precede_end() {
            let r = loaded("[backtest]\nstart_date = 2023-06-01\nend_date = 2023-06-01\n");
            assert_invalid_key(r, "start_date");
        }

        #[test]
        fn bad_date_format() {
            let r = loaded("[backtest]\nstart_date = 01/02/2023\nend_date = 2023-06-01\n");
            assert_invalid_key(r, "start_date");
        }

        #[test]
        fn missing_end_date() {
            let r = loaded("[backtest]\nstart_date = 2023-01-01\n");
            assert!(matches!(r, Err(ScoreTraderError::ConfigMissing { key, .. }) if key == "end_date"));
        }
    }

    mod data {
        use super::*;

        #[test]
        fn valid_data_section() {
            assert!(validate_data_config(&make_config(VALID)).is_ok());
        }

        #[test]
        fn missing_price_dir() {
            let r = validate_data_config(&make_config("[data]\nsymbols = AAPL\n"));
            assert!(matches!(r, Err(ScoreTraderError::ConfigMissing { key, .. }) if key == "price_dir"));
        }

        #[test]
        fn bad_symbol_list() {
            let r = validate_data_config(&make_config("[data]\nprice_dir = x\nsymbols = AAPL,,MSFT\n"));
            assert_invalid_key(r, "symbols");
        }
    }

    mod analysis {
        use super::*;

        #[test]
        fn defaults() {
            let a = load_analysis_config(&make_config(VALID)).unwrap();
            assert_eq!(a.cap_threshold, 1e9);
            assert_eq!(a.top_n, 10);
        }

        #[test]
        fn top_n_zero_rejected() {
            let r = load_analysis_config(&make_config("[analysis]\ntop_n = 0\n"));
            assert_invalid_key(r, "top_n");
        }

        #[test]
        fn negative_threshold_rejected() {
            let r = load_analysis_config(&make_config("[analysis]\ncap_threshold = -5\n"));
            assert_invalid_key(r, "cap_threshold");
        }
    }
}
