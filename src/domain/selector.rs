//! Picks the single best-scored instrument for a date.

use crate::domain::score_table::ScoreTable;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub symbol: String,
    pub score: f64,
}

/// Highest composite among rows dated exactly `date`.
///
/// Ties go to the lexicographically smallest symbol. `None` when the table
/// has no row for that date.
pub fn select_best(date: NaiveDate, table: &ScoreTable) -> Option<Candidate> {
    table
        .rows_on(date)
        .iter()
        .min_by(|a, b| {
            b.composite
                .total_cmp(&a.composite)
                .then_with(|| a.symbol.cmp(&b.symbol))
        })
        .map(|row| Candidate {
            symbol: row.symbol.clone(),
            score: row.composite,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::composite::SignalBreakdown;
    use crate::domain::score_table::ScoreTableRow;
    use crate::domain::signal::Signal;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(date: &str, symbol: &str, composite: f64) -> ScoreTableRow {
        let n = Signal::neutral();
        ScoreTableRow {
            date: d(date),
            symbol: symbol.to_string(),
            composite,
            breakdown: SignalBreakdown {
                ema: n,
                rsi: n,
                adx: n,
                donchian: n,
                volume: n,
            },
        }
    }

    #[test]
    fn picks_highest() {
        let table = ScoreTable::from_rows(vec![
            row("2024-01-02", "AAA", 3.2),
            row("2024-01-02", "BBB", 4.0),
            row("2024-01-02", "CCC", 2.0),
            row("2024-01-03", "CCC", 5.0),
        ]);
        let best = select_best(d("2024-01-02"), &table).unwrap();
        assert_eq!(best.symbol, "BBB");
        assert_eq!(best.score, 4.0);
    }

    #[test]
    fn only_exact_date_counts() {
        let table = ScoreTable::from_rows(vec![row("2024-01-03", "CCC", 5.0)]);
        assert_eq!(select_best(d("2024-01-02"), &table), None);
        assert_eq!(select_best(d("2024-01-04"), &table), None);
    }

    #[test]
    fn tie_goes_to_smallest_symbol() {
        let table = ScoreTable::from_rows(vec![
            row("2024-01-02", "MSFT", 4.2),
            row("2024-01-02", "AAPL", 4.2),
            row("2024-01-02", "ZM", 1.0),
        ]);
        let first = select_best(d("2024-01-02"), &table).unwrap();
        let second = select_best(d("2024-01-02"), &table).unwrap();
        assert_eq!(first.symbol, "AAPL");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_table() {
        assert_eq!(select_best(d("2024-01-02"), &ScoreTable::default()), None);
    }
}
