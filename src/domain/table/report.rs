// ============================================================
// INGEST REPORTS
// ============================================================
// What each pipeline stage did to the data

use serde::{Deserialize, Serialize};

use super::{SourceKind, Table};

/// Counts recorded by schema repair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationReport {
    /// Rows whose cells were all null
    pub empty_rows_dropped: usize,

    /// Rows whose non-null count differed from the modal width
    pub width_mismatch_dropped: usize,

    /// Most common non-null cell count
    pub modal_width: usize,

    /// Whether the first row became the column names
    pub header_promoted: bool,
}

/// Summary of one ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub source_kind: SourceKind,

    /// Encoding that decoded the source; `None` for spreadsheets
    pub encoding: Option<String>,

    /// Rows held after bounded reading
    pub rows_read: usize,

    pub normalization: NormalizationReport,

    /// Rows left after sorting, filtering and sampling
    pub rows_out: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Result of a successful ingestion run
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub table: Table,
    pub report: IngestReport,
}
