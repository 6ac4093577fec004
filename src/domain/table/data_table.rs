// ============================================================
// TABLE TYPES
// ============================================================
// Raw (ragged) and normalized (rectangular) table representations

use serde::{Deserialize, Serialize};

use super::Cell;
use crate::domain::error::{AppError, Result};

/// A single data row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Ordinal assigned at normalization (0-based, contiguous)
    pub index: usize,

    /// Cell values, one per column
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(index: usize, cells: Vec<Cell>) -> Self {
        Self { index, cells }
    }

    /// Number of cells that hold a value
    pub fn non_null_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_null()).count()
    }
}

/// Table as read from the source, before schema repair.
/// Rows may differ in width and no header is guaranteed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<Cell>>,

    /// Column names already known for this data
    pub header: Option<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows, header: None }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Table> for RawTable {
    fn from(table: Table) -> Self {
        Self {
            rows: table.rows.into_iter().map(|row| row.cells).collect(),
            header: Some(table.columns),
        }
    }
}

/// Normalized table: every row has exactly `columns.len()` cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, rejecting rows whose width differs from the column count
    pub fn try_new(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        if let Some(row) = rows.iter().find(|r| r.cells.len() != columns.len()) {
            return Err(AppError::ValidationError(format!(
                "row {} has {} cells, expected {}",
                row.index,
                row.cells.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Build a table the caller has already made rectangular
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|r| r.cells.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Last `n` rows
    pub fn tail(&self, n: usize) -> Table {
        let skip = self.rows.len().saturating_sub(n);
        Table {
            columns: self.columns.clone(),
            rows: self.rows[skip..].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let rows = (0..5)
            .map(|i| Row::new(i, vec![Cell::number(i as f64), Cell::Text(format!("r{}", i))]))
            .collect();
        Table::try_new(vec!["id".to_string(), "name".to_string()], rows).unwrap()
    }

    #[test]
    fn test_try_new_rejects_ragged_rows() {
        let rows = vec![Row::new(0, vec![Cell::Null])];
        let result = Table::try_new(vec!["a".to_string(), "b".to_string()], rows);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_head_and_tail() {
        let table = sample_table();
        let head = table.head(2);
        assert_eq!(head.row_count(), 2);
        assert_eq!(head.rows()[0].index, 0);

        let tail = table.tail(2);
        assert_eq!(tail.row_count(), 2);
        assert_eq!(tail.rows()[1].index, 4);

        assert_eq!(table.tail(50).row_count(), 5);
    }

    #[test]
    fn test_into_raw_keeps_header() {
        let raw = RawTable::from(sample_table());
        assert_eq!(raw.header, Some(vec!["id".to_string(), "name".to_string()]));
        assert_eq!(raw.len(), 5);
    }
}
