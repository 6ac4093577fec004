use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Cell, RawTable, SheetSelector, DEFAULT_MAX_ROWS};

use super::ReadOutcome;

/// Reads a single worksheet, capped at `max_rows`.
/// Workbooks carry their own encoding, so no candidate list is involved.
pub struct SpreadsheetReader {
    max_rows: usize,
    sheet: SheetSelector,
}

impl Default for SpreadsheetReader {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            sheet: SheetSelector::default(),
        }
    }
}

impl SpreadsheetReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_sheet(mut self, sheet: SheetSelector) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn read_path(&self, path: &Path) -> Result<ReadOutcome> {
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            AppError::ParseError(format!("Failed to open workbook {}: {}", path.display(), e))
        })?;

        let sheet_names = workbook.sheet_names().to_vec();
        let not_found = || {
            AppError::SheetNotFound(format!(
                "{} (available: {})",
                self.sheet,
                sheet_names.join(", ")
            ))
        };

        let range = match &self.sheet {
            SheetSelector::Index(idx) => workbook.worksheet_range_at(*idx).ok_or_else(not_found)??,
            SheetSelector::Name(name) => {
                if !sheet_names.iter().any(|s| s == name) {
                    return Err(not_found());
                }
                workbook.worksheet_range(name)?
            }
        };

        let table = rows_from_range(&range, self.max_rows);
        info!(
            sheet = %self.sheet,
            rows = table.len(),
            "Read worksheet"
        );

        Ok(ReadOutcome {
            table,
            encoding: None,
        })
    }
}

fn rows_from_range(range: &Range<Data>, max_rows: usize) -> RawTable {
    let rows = range
        .rows()
        .take(max_rows)
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    RawTable::new(rows)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Null,
        Data::Int(value) => Cell::Number {
            value: *value as f64,
            raw: value.to_string(),
        },
        Data::Float(value) => Cell::number(*value),
        Data::String(value) => Cell::parse(value),
        Data::Bool(value) => Cell::Text(value.to_string()),
        other => Cell::Text(other.to_string()),
    }
}
