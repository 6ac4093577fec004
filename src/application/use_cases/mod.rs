pub mod ingest_pipeline;
pub mod row_filter;
pub mod schema_normalizer;
pub mod sorter;
