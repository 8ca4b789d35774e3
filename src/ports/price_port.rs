//! Price-history provider port.

use crate::domain::error::ScoreTraderError;
use crate::domain::price::PriceHistory;
use chrono::NaiveDate;

pub trait PricePort {
    /// History for `symbol`, clipped to the optional bounds (inclusive).
    ///
    /// Missing sources fail with `DataUnavailable`, unparseable ones with
    /// `MalformedData`. An existing but empty source yields an empty history.
    fn fetch_history(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceHistory, ScoreTraderError>;

    /// Every symbol this provider can serve, sorted.
    fn list_symbols(&self) -> Result<Vec<String>, ScoreTraderError>;
}
