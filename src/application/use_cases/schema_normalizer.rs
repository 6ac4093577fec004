// ============================================================
// SCHEMA NORMALIZER
// ============================================================
// Repair ragged rows and settle on a header

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::domain::table::{Cell, HeaderPolicy, NormalizationReport, RawTable, Row, Table};

/// Turns a raw table into a rectangular one with meaningful column names
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaNormalizer {
    header: HeaderPolicy,
}

impl SchemaNormalizer {
    pub fn new(header: HeaderPolicy) -> Self {
        Self { header }
    }

    /// Normalize a raw table.
    ///
    /// Repair is lossy: rows whose non-null count differs from the modal
    /// count are dropped, never padded.
    pub fn normalize(&self, raw: RawTable) -> (Table, NormalizationReport) {
        let mut report = NormalizationReport::default();
        let RawTable { rows, header } = raw;

        let before = rows.len();
        let rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .filter(|row| row.iter().any(|c| !c.is_null()))
            .collect();
        report.empty_rows_dropped = before - rows.len();

        report.modal_width = modal_width(&rows);
        let before = rows.len();
        let mut rows: Vec<Vec<Cell>> = rows
            .into_iter()
            .filter(|row| non_null_count(row) == report.modal_width)
            .collect();
        report.width_mismatch_dropped = before - rows.len();

        let width = rows
            .iter()
            .map(Vec::len)
            .chain(header.as_ref().map(Vec::len))
            .max()
            .unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::Null);
        }

        let columns = match header {
            Some(names) => extend_positional(names, width),
            None => {
                let (columns, promoted) = self.resolve_header(&mut rows, width);
                report.header_promoted = promoted;
                columns
            }
        };

        let rows: Vec<Row> = rows
            .into_iter()
            .enumerate()
            .map(|(index, cells)| Row::new(index, cells))
            .collect();

        debug!(
            empty = report.empty_rows_dropped,
            mismatched = report.width_mismatch_dropped,
            modal_width = report.modal_width,
            "Dropped irregular rows"
        );
        info!(
            rows = rows.len(),
            columns = columns.len(),
            header_promoted = report.header_promoted,
            "Normalized table"
        );

        (Table::from_parts(columns, rows), report)
    }

    /// Decide the column names, removing the first row when it is promoted
    fn resolve_header(&self, rows: &mut Vec<Vec<Cell>>, width: usize) -> (Vec<String>, bool) {
        let first_is_complete = rows
            .first()
            .map(|row| row.iter().all(|c| !c.is_null()))
            .unwrap_or(false);

        match self.header {
            HeaderPolicy::Never => (positional_names(0, width), false),
            HeaderPolicy::Always if !rows.is_empty() => {
                let first = rows.remove(0);
                (names_from_row(&first), true)
            }
            HeaderPolicy::Infer if first_is_complete => {
                let first = rows.remove(0);
                (names_from_row(&first), true)
            }
            HeaderPolicy::Infer if rows.len() == 1 => {
                // A lone row is a header-only table, even when incomplete
                rows.clear();
                (positional_names(0, width), false)
            }
            _ => (positional_names(0, width), false),
        }
    }
}

fn non_null_count(row: &[Cell]) -> usize {
    row.iter().filter(|c| !c.is_null()).count()
}

/// Most frequent non-null count; ties go to the larger count
fn modal_width(rows: &[Vec<Cell>]) -> usize {
    let mut frequency: HashMap<usize, usize> = HashMap::new();
    for row in rows {
        *frequency.entry(non_null_count(row)).or_insert(0) += 1;
    }

    frequency
        .into_iter()
        .max_by(|(w1, c1), (w2, c2)| c1.cmp(c2).then(w1.cmp(w2)))
        .map(|(width, _)| width)
        .unwrap_or(0)
}

fn positional_names(start: usize, end: usize) -> Vec<String> {
    (start..end).map(|i| i.to_string()).collect()
}

fn extend_positional(mut names: Vec<String>, width: usize) -> Vec<String> {
    let start = names.len();
    names.extend(positional_names(start, width));
    names
}

/// Column names from a promoted row; nulls become positional, repeats get `.N`
fn names_from_row(row: &[Cell]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    row.iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell {
                Cell::Null => idx.to_string(),
                other => other.render(),
            };

            let mut name = base.clone();
            let mut suffix = 1;
            while seen.contains(&name) {
                name = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}
