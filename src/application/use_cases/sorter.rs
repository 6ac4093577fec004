use std::cmp::Ordering;

use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Cell, SortDirection, SortSpec, Table};

/// Stable single-column sort.
/// Nulls come first when ascending and last when descending.
#[derive(Debug, Clone, Copy)]
pub struct Sorter {
    column: usize,
    direction: SortDirection,
}

impl Sorter {
    pub fn new(column: usize, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub fn apply(&self, table: Table) -> Result<Table> {
        if self.column >= table.column_count() {
            return Err(AppError::ColumnIndexOutOfRange {
                index: self.column,
                column_count: table.column_count(),
            });
        }

        let (columns, mut rows) = table.into_parts();
        let column = self.column;
        rows.sort_by(|a, b| self.compare(&a.cells[column], &b.cells[column]));

        debug!(
            column = %columns[column],
            direction = ?self.direction,
            rows = rows.len(),
            "Sorted rows"
        );
        Ok(Table::from_parts(columns, rows))
    }

    fn compare(&self, a: &Cell, b: &Cell) -> Ordering {
        let ascending = self.direction == SortDirection::Ascending;
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) if ascending => Ordering::Less,
            (true, false) => Ordering::Greater,
            (false, true) if ascending => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = a.cmp_present(b).unwrap_or(Ordering::Equal);
                if ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
        }
    }
}

impl From<SortSpec> for Sorter {
    fn from(spec: SortSpec) -> Self {
        Self::new(spec.column, spec.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Row;

    fn table(rows: Vec<Vec<Cell>>) -> Table {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| Row::new(i, cells))
            .collect();
        Table::try_new(vec!["name".to_string(), "value".to_string()], rows).unwrap()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn names(table: &Table) -> Vec<String> {
        table.rows().iter().map(|r| r.cells[0].render()).collect()
    }

    #[test]
    fn test_descending_is_stable() {
        let input = table(vec![
            vec![text("A"), Cell::number(3.0)],
            vec![text("B"), Cell::number(1.0)],
            vec![text("C"), Cell::number(3.0)],
        ]);
        let sorted = Sorter::new(1, SortDirection::Descending).apply(input).unwrap();
        assert_eq!(names(&sorted), vec!["A", "C", "B"]);
        // rows keep the ordinal they were normalized with
        assert_eq!(sorted.rows()[2].index, 1);
    }

    #[test]
    fn test_nulls_first_ascending_last_descending() {
        let rows = vec![
            vec![text("x"), Cell::number(2.0)],
            vec![text("n1"), Cell::Null],
            vec![text("y"), Cell::number(1.0)],
            vec![text("n2"), Cell::Null],
        ];

        let asc = Sorter::new(1, SortDirection::Ascending)
            .apply(table(rows.clone()))
            .unwrap();
        assert_eq!(names(&asc), vec!["n1", "n2", "y", "x"]);

        let desc = Sorter::new(1, SortDirection::Descending)
            .apply(table(rows))
            .unwrap();
        assert_eq!(names(&desc), vec!["x", "y", "n1", "n2"]);
    }

    #[test]
    fn test_mixed_numbers_and_text() {
        let input = table(vec![
            vec![text("a"), text("zeta")],
            vec![text("b"), Cell::number(10.0)],
            vec![text("c"), Cell::number(9.0)],
        ]);
        let sorted = Sorter::new(1, SortDirection::Ascending).apply(input).unwrap();
        assert_eq!(names(&sorted), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_out_of_range_column() {
        let input = table(vec![vec![text("a"), Cell::Null]]);
        let err = Sorter::new(2, SortDirection::Ascending).apply(input).unwrap_err();
        assert!(matches!(
            err,
            AppError::ColumnIndexOutOfRange {
                index: 2,
                column_count: 2
            }
        ));
    }
}
