// ============================================================
// SOURCE KIND
// ============================================================
// Input format derived from the file extension

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::error::{AppError, Result};

/// Recognized input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    DelimitedComma,
    DelimitedTab,
    Spreadsheet,
}

impl SourceKind {
    /// Derive the source kind from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| {
                AppError::UnsupportedSourceKind(format!(
                    "{} has no file extension",
                    path.display()
                ))
            })?;

        match ext.as_str() {
            "csv" => Ok(SourceKind::DelimitedComma),
            "tsv" | "tab" => Ok(SourceKind::DelimitedTab),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceKind::Spreadsheet),
            other => Err(AppError::UnsupportedSourceKind(format!(
                ".{} ({})",
                other,
                path.display()
            ))),
        }
    }

    /// Field delimiter for delimited sources
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            SourceKind::DelimitedComma => Some(b','),
            SourceKind::DelimitedTab => Some(b'\t'),
            SourceKind::Spreadsheet => None,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::DelimitedComma => write!(f, "delimited-comma"),
            SourceKind::DelimitedTab => write!(f, "delimited-tab"),
            SourceKind::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            SourceKind::from_path(Path::new("data.CSV")).unwrap(),
            SourceKind::DelimitedComma
        );
        assert_eq!(
            SourceKind::from_path(Path::new("dir/export.tsv")).unwrap(),
            SourceKind::DelimitedTab
        );
        assert_eq!(
            SourceKind::from_path(Path::new("book.xlsx")).unwrap(),
            SourceKind::Spreadsheet
        );
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            SourceKind::from_path(Path::new("notes.txt")),
            Err(AppError::UnsupportedSourceKind(_))
        ));
        assert!(matches!(
            SourceKind::from_path(Path::new("README")),
            Err(AppError::UnsupportedSourceKind(_))
        ));
    }
}
