// ============================================================
// ROW FILTER
// ============================================================
// Pattern matching across rendered cells, and bounded random sampling

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use regex::Regex;
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Row, Table};

/// Keeps rows where at least one cell, rendered as text, matches a regex
#[derive(Debug, Clone)]
pub struct PatternFilter {
    regex: Regex,
}

impl PatternFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| AppError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// Null cells are never matched
    pub fn matches(&self, row: &Row) -> bool {
        row.cells
            .iter()
            .filter(|cell| !cell.is_null())
            .any(|cell| self.regex.is_match(&cell.render()))
    }

    pub fn apply(&self, table: Table) -> Table {
        let before = table.row_count();
        let (columns, rows) = table.into_parts();
        let rows: Vec<Row> = rows.into_iter().filter(|row| self.matches(row)).collect();

        debug!(
            pattern = self.regex.as_str(),
            before = before,
            after = rows.len(),
            "Filtered rows"
        );
        Table::from_parts(columns, rows)
    }
}

/// Draws `size` rows uniformly at random, without replacement
#[derive(Debug, Clone, Copy)]
pub struct RowSampler {
    size: usize,
    seed: Option<u64>,
}

impl RowSampler {
    pub fn new(size: usize) -> Self {
        Self { size, seed: None }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn apply(&self, table: Table) -> Table {
        match self.seed {
            Some(seed) => self.apply_with_rng(table, &mut StdRng::seed_from_u64(seed)),
            None => self.apply_with_rng(table, &mut rand::thread_rng()),
        }
    }

    /// Result order follows the draw, not the input
    pub fn apply_with_rng<R: Rng + ?Sized>(&self, table: Table, rng: &mut R) -> Table {
        let (columns, rows) = table.into_parts();
        let amount = self.size.min(rows.len());
        let picks = index::sample(rng, rows.len(), amount);

        let mut slots: Vec<Option<Row>> = rows.into_iter().map(Some).collect();
        let sampled: Vec<Row> = picks
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();

        debug!(requested = self.size, sampled = sampled.len(), "Sampled rows");
        Table::from_parts(columns, sampled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Cell;
    use std::collections::HashSet;

    fn table(rows: Vec<Vec<Cell>>) -> Table {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        let columns = (0..width).map(|i| i.to_string()).collect();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| Row::new(i, cells))
            .collect();
        Table::try_new(columns, rows).unwrap()
    }

    fn numbered(n: usize) -> Table {
        table((0..n).map(|i| vec![Cell::number(i as f64)]).collect())
    }

    #[test]
    fn test_anchored_pattern_keeps_matching_rows() {
        let input = table(vec![
            vec![Cell::Text("ok".to_string()), Cell::number(200.0)],
            vec![Cell::Text("ERR404".to_string()), Cell::number(404.0)],
            vec![Cell::Text("warn ERR".to_string()), Cell::Null],
        ]);

        let filtered = PatternFilter::new("^ERR").unwrap().apply(input);
        assert_eq!(filtered.row_count(), 1);
        assert_eq!(filtered.rows()[0].index, 1);
    }

    #[test]
    fn test_numbers_match_their_rendered_text() {
        let input = table(vec![
            vec![Cell::number(404.0)],
            vec![Cell::number(40.5)],
        ]);
        let filtered = PatternFilter::new("^404$").unwrap().apply(input);
        assert_eq!(filtered.row_count(), 1);
    }

    #[test]
    fn test_numeric_cells_match_the_text_they_were_read_from() {
        let input = table(vec![
            vec![Cell::parse("02134")],
            vec![Cell::parse("12345678901234567891")],
            vec![Cell::parse("1e3")],
            vec![Cell::parse("2134")],
        ]);

        let zip = PatternFilter::new("^021").unwrap().apply(input.clone());
        assert_eq!(zip.row_count(), 1);
        assert_eq!(zip.rows()[0].index, 0);

        let long = PatternFilter::new("67891$").unwrap().apply(input.clone());
        assert_eq!(long.row_count(), 1);
        assert_eq!(long.rows()[0].index, 1);

        let exponent = PatternFilter::new("^1e3$").unwrap().apply(input);
        assert_eq!(exponent.row_count(), 1);
        assert_eq!(exponent.rows()[0].index, 2);
    }

    #[test]
    fn test_null_cells_never_match() {
        let input = table(vec![vec![Cell::Null, Cell::Text("x".to_string())]]);
        let filtered = PatternFilter::new("^$").unwrap().apply(input);
        assert_eq!(filtered.row_count(), 0);
    }

    #[test]
    fn test_filter_is_a_subset() {
        let input = numbered(50);
        let filter = PatternFilter::new("7").unwrap();
        let filtered = filter.apply(input.clone());

        assert!(filtered.rows().iter().all(|r| input.rows().contains(r)));
        assert!(filtered.rows().iter().all(|r| filter.matches(r)));
        assert_eq!(filtered.row_count(), 5); // 7, 17, 27, 37, 47
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PatternFilter::new("(unclosed").unwrap_err();
        match err {
            AppError::InvalidPattern { pattern, message } => {
                assert_eq!(pattern, "(unclosed");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_sample_without_replacement() {
        let sampled = RowSampler::new(10).with_seed(Some(7)).apply(numbered(100));
        assert_eq!(sampled.row_count(), 10);

        let unique: HashSet<usize> = sampled.rows().iter().map(|r| r.index).collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_sample_larger_than_table_returns_every_row() {
        let sampled = RowSampler::new(500).apply(numbered(20));
        assert_eq!(sampled.row_count(), 20);

        let unique: HashSet<usize> = sampled.rows().iter().map(|r| r.index).collect();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn test_seeded_sample_is_reproducible() {
        let a = RowSampler::new(5).with_seed(Some(42)).apply(numbered(40));
        let b = RowSampler::new(5).with_seed(Some(42)).apply(numbered(40));
        assert_eq!(a, b);
    }

    #[test]
    fn test_filter_then_sample() {
        let filtered = PatternFilter::new("^1").unwrap().apply(numbered(30));
        let sampled = RowSampler::new(3).with_seed(Some(1)).apply(filtered.clone());
        assert_eq!(sampled.row_count(), 3);
        assert!(sampled.rows().iter().all(|r| filtered.rows().contains(r)));
    }
}
