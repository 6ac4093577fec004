// ============================================================
// CELL VALUES
// ============================================================
// Tagged cell representation shared by every pipeline stage

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tokens that conventionally mean "no value" in tabular exports
const MISSING_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),

    /// `value` orders the cell; `raw` is the field text it was read from
    Number { value: f64, raw: String },

    Null,
}

impl Cell {
    /// Classify a raw text field
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed) {
            return Cell::Null;
        }

        match trimmed.parse::<f64>() {
            Ok(value) => Cell::Number {
                value,
                raw: trimmed.to_string(),
            },
            Err(_) => Cell::Text(raw.to_string()),
        }
    }

    /// A number with no source text; renders integral values without a fraction
    pub fn number(value: f64) -> Self {
        Cell::Number {
            value,
            raw: format_number(value),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Render the cell as text. Numbers keep the text they were read from;
    /// `Null` renders empty.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number { raw, .. } => raw.clone(),
            Cell::Null => String::new(),
        }
    }

    /// Order two present values. Numbers sort before text.
    /// Returns `None` when either side is `Null`; callers decide where nulls go.
    pub fn cmp_present(&self, other: &Cell) -> Option<Ordering> {
        match (self, other) {
            (Cell::Number { value: a, .. }, Cell::Number { value: b, .. }) => {
                Some(a.total_cmp(b))
            }
            (Cell::Text(a), Cell::Text(b)) => Some(a.cmp(b)),
            (Cell::Number { .. }, Cell::Text(_)) => Some(Ordering::Less),
            (Cell::Text(_), Cell::Number { .. }) => Some(Ordering::Greater),
            _ => None,
        }
    }
}

fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        format!("{}", number)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
