// ============================================================
// BOUNDED READER
// ============================================================
// Load a source into a raw table, never holding more than max_rows rows

mod delimited;
mod spreadsheet;

use std::path::Path;

use crate::domain::error::Result;
use crate::domain::table::{IngestConfig, RawTable, SourceKind};
use crate::infrastructure::encoding::EncodingResolver;

pub use delimited::DelimitedReader;
pub use spreadsheet::SpreadsheetReader;

/// Raw table plus the encoding that decoded it
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub table: RawTable,

    /// Winning candidate label; `None` for spreadsheets
    pub encoding: Option<String>,
}

/// Dispatches to the reader for a source kind
pub struct BoundedReader {
    config: IngestConfig,
    resolver: EncodingResolver,
}

impl BoundedReader {
    pub fn new(config: &IngestConfig) -> Self {
        let resolver = EncodingResolver::new()
            .with_forced(config.encoding.clone())
            .with_fallbacks(config.fallback_encodings.clone());

        Self {
            config: config.clone(),
            resolver,
        }
    }

    pub fn read(&self, path: &Path, kind: SourceKind) -> Result<ReadOutcome> {
        match kind.delimiter() {
            Some(delimiter) => DelimitedReader::new()
                .with_delimiter(delimiter)
                .with_max_rows(self.config.max_rows)
                .with_chunk_size(self.config.chunk_size)
                .read_path(path, &self.resolver),
            None => SpreadsheetReader::new()
                .with_max_rows(self.config.max_rows)
                .with_sheet(self.config.sheet.clone())
                .read_path(path),
        }
    }
}
