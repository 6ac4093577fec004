pub mod use_cases;

pub use use_cases::ingest_pipeline::IngestPipeline;
pub use use_cases::row_filter::{PatternFilter, RowSampler};
pub use use_cases::schema_normalizer::SchemaNormalizer;
pub use use_cases::sorter::Sorter;
