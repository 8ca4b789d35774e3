//! Instrument metadata port: descriptions and market capitalisation.

use std::fmt;

pub const UNKNOWN_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Known(String),
    Unknown,
}

impl Description {
    pub fn as_str(&self) -> &str {
        match self {
            Description::Known(text) => text,
            Description::Unknown => UNKNOWN_DESCRIPTION,
        }
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait MetadataPort {
    fn describe(&self, symbol: &str) -> Description;

    /// Reported market cap; `None` when the provider has no figure.
    fn market_cap(&self, symbol: &str) -> Option<f64>;
}
