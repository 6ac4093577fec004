use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub enum AppError {
    /// The file extension is not one of the recognized source kinds.
    UnsupportedSourceKind(String),
    /// Every candidate encoding failed to decode the input.
    DecodingExhausted { attempted: Vec<String> },
    /// A sort target lies beyond the table schema.
    ColumnIndexOutOfRange { index: usize, column_count: usize },
    /// The row filter expression does not compile.
    InvalidPattern { pattern: String, message: String },
    SheetNotFound(String),
    ConfigError(String),
    ValidationError(String),
    ParseError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UnsupportedSourceKind(msg) => write!(f, "Unsupported source kind: {}", msg),
            AppError::DecodingExhausted { attempted } => write!(
                f,
                "Decoding exhausted: no candidate encoding could decode the input (tried {})",
                attempted.join(", ")
            ),
            AppError::ColumnIndexOutOfRange {
                index,
                column_count,
            } => write!(
                f,
                "Column index out of range: {} (table has {} columns)",
                index, column_count
            ),
            AppError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid pattern {:?}: {}", pattern, message)
            }
            AppError::SheetNotFound(msg) => write!(f, "Sheet not found: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<calamine::Error> for AppError {
    fn from(err: calamine::Error) -> Self {
        AppError::ParseError(format!("Failed to read workbook: {}", err))
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoding_exhausted_names_every_encoding() {
        let err = AppError::DecodingExhausted {
            attempted: vec!["UTF-8".to_string(), "windows-1252".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("UTF-8"));
        assert!(msg.contains("windows-1252"));
    }

    #[test]
    fn test_column_index_out_of_range_message() {
        let err = AppError::ColumnIndexOutOfRange {
            index: 7,
            column_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Column index out of range: 7 (table has 3 columns)"
        );
    }
}
