pub mod error;

// Tabular ingestion module
pub mod table;
