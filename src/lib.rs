pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

mod app;

pub use app::run;
pub use application::IngestPipeline;
pub use domain::error::{AppError, Result};
pub use domain::table::{
    Cell, HeaderPolicy, IngestConfig, IngestOutcome, IngestReport, RawTable, Row, SheetSelector,
    SortDirection, SortSpec, SourceKind, Table,
};
