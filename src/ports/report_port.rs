//! Report output port.

use crate::domain::error::ScoreTraderError;
use crate::domain::ledger::Ledger;
use crate::domain::opportunity::OpportunityReport;
use crate::domain::score_table::ScoreTable;
use std::path::PathBuf;

/// Writes the tabular artifacts of a run. Each method returns the path it
/// wrote.
pub trait ReportPort {
    fn write_score_table(&self, table: &ScoreTable) -> Result<PathBuf, ScoreTraderError>;

    fn write_ledger(&self, ledger: &Ledger) -> Result<PathBuf, ScoreTraderError>;

    fn write_opportunities(&self, report: &OpportunityReport) -> Result<PathBuf, ScoreTraderError>;
}
