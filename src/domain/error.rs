//! Domain error types.
//!
//! Short histories and dates without candidates are not errors: they resolve
//! to neutral signals and `None` selections respectively.

/// Top-level error type for scoretrader.
#[derive(Debug, thiserror::Error)]
pub enum ScoreTraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no price data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("malformed price data for {symbol}: {reason}")]
    MalformedData { symbol: String, reason: String },

    #[error("instrument universe is empty")]
    EmptyUniverse,

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScoreTraderError {
    /// True for failures that only disqualify one instrument.
    pub fn is_per_instrument(&self) -> bool {
        matches!(
            self,
            ScoreTraderError::DataUnavailable { .. } | ScoreTraderError::MalformedData { .. }
        )
    }
}

impl From<&ScoreTraderError> for std::process::ExitCode {
    fn from(err: &ScoreTraderError) -> Self {
        let code: u8 = match err {
            ScoreTraderError::Io(_) => 1,
            ScoreTraderError::ConfigParse { .. }
            | ScoreTraderError::ConfigMissing { .. }
            | ScoreTraderError::ConfigInvalid { .. } => 2,
            ScoreTraderError::DataUnavailable { .. }
            | ScoreTraderError::MalformedData { .. }
            | ScoreTraderError::EmptyUniverse => 5,
            ScoreTraderError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
