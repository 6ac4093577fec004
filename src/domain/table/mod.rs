// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// Core types and value objects for tabular ingestion
// No I/O

mod cell;
mod data_table;
mod ingest_config;
mod report;
mod source_kind;

pub use cell::Cell;
pub use data_table::{RawTable, Row, Table};
pub use ingest_config::{
    HeaderPolicy, IngestConfig, SheetSelector, SortDirection, SortSpec, DEFAULT_CHUNK_SIZE,
    DEFAULT_MAX_ROWS,
};
pub use report::{IngestOutcome, IngestReport, NormalizationReport};
pub use source_kind::SourceKind;
