//! Plain-text table preview
//!
//! Display settings are passed in explicitly; nothing here reads global state.

use serde::{Deserialize, Serialize};

use crate::domain::table::Table;

/// Presentation settings for a preview, read from the `[display]` config table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Rows shown (default: 10)
    pub max_rows: usize,

    /// Cell text longer than this is cut with an ellipsis (default: 32)
    pub max_cell_width: usize,

    /// Show the last rows instead of the first
    pub tail: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_rows: 10,
            max_cell_width: 32,
            tail: false,
        }
    }
}

/// Render a column-aligned preview of `table`
pub fn render_preview(table: &Table, options: &DisplayOptions) -> String {
    let view = if options.tail {
        table.tail(options.max_rows)
    } else {
        table.head(options.max_rows)
    };

    let mut lines: Vec<Vec<String>> = Vec::with_capacity(view.row_count() + 1);
    let mut header = vec![String::new()];
    header.extend(view.columns().iter().map(|c| clip(c, options.max_cell_width)));
    lines.push(header);

    for row in view.rows() {
        let mut line = vec![row.index.to_string()];
        line.extend(
            row.cells
                .iter()
                .map(|c| clip(&c.render(), options.max_cell_width)),
        );
        lines.push(line);
    }

    let widths: Vec<usize> = (0..lines[0].len())
        .map(|col| {
            lines
                .iter()
                .map(|l| l[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = lines
        .iter()
        .map(|line| {
            line.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n");

    out.push_str(&format!(
        "\n\n[{} rows x {} columns]",
        table.row_count(),
        table.column_count()
    ));
    out
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
