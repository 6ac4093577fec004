// ============================================================
// INGEST PIPELINE USE CASE
// ============================================================
// Orchestrate bounded reading, schema repair, sorting, and filtering

use std::path::Path;
use std::time::Instant;

use tracing::info;
use validator::Validate;

use crate::application::use_cases::row_filter::{PatternFilter, RowSampler};
use crate::application::use_cases::schema_normalizer::SchemaNormalizer;
use crate::application::use_cases::sorter::Sorter;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{IngestConfig, IngestOutcome, IngestReport, SourceKind};
use crate::infrastructure::reader::BoundedReader;

/// Ingestion use case: one file in, one normalized table out
pub struct IngestPipeline {
    config: IngestConfig,
}

impl IngestPipeline {
    /// Create a new pipeline
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration
    pub fn default_config() -> Self {
        Self::new(IngestConfig::default())
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Load, normalize, and narrow a table from `path`.
    /// Any error aborts the run; no partial table is returned.
    pub fn run(&self, path: &Path) -> Result<IngestOutcome> {
        let start = Instant::now();

        self.config.validate().map_err(|e| {
            AppError::ValidationError(format!("Invalid ingest config: {}", e))
        })?;

        let source_kind = SourceKind::from_path(path)?;

        // Compile before reading so a bad pattern fails fast
        let pattern = self
            .config
            .pattern
            .as_deref()
            .map(PatternFilter::new)
            .transpose()?;

        info!(path = %path.display(), kind = %source_kind, "Reading source");
        let read = BoundedReader::new(&self.config).read(path, source_kind)?;
        let rows_read = read.table.len();

        let (mut table, normalization) =
            SchemaNormalizer::new(self.config.header).normalize(read.table);

        if let Some(spec) = self.config.sort {
            table = Sorter::from(spec).apply(table)?;
        }

        if let Some(filter) = &pattern {
            table = filter.apply(table);
        }

        if let Some(size) = self.config.sample_size {
            table = RowSampler::new(size)
                .with_seed(self.config.sample_seed)
                .apply(table);
        }

        let processing_time = start.elapsed();
        let report = IngestReport {
            source_kind,
            encoding: read.encoding,
            rows_read,
            normalization,
            rows_out: table.row_count(),
            processing_time_ms: processing_time.as_millis() as u64,
        };

        info!(
            rows = report.rows_out,
            columns = table.column_count(),
            encoding = report.encoding.as_deref().unwrap_or("n/a"),
            elapsed_ms = report.processing_time_ms,
            "Ingestion complete"
        );

        Ok(IngestOutcome { table, report })
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::default_config()
    }
}
