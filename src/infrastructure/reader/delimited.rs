// ============================================================
// DELIMITED READER
// ============================================================
// Chunked, row-capped CSV/TSV reading with encoding fallback

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::table::{Cell, RawTable, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_ROWS};
use crate::infrastructure::encoding::{
    is_malformed_input, strip_bom, DecodingReader, EncodingCandidate, EncodingResolver,
    DETECTION_PREFIX_LEN,
};

use super::ReadOutcome;

/// Why a single encoding attempt stopped
enum AttemptFailure {
    /// The candidate could not decode or parse the input; try the next one
    Rejected(String),
    /// Reading the source itself failed; no candidate can succeed
    Fatal(AppError),
}

/// Reader for comma or tab separated sources
pub struct DelimitedReader {
    /// Field delimiter (default: comma)
    delimiter: u8,

    /// Hard cap on rows read
    max_rows: usize,

    /// Rows per read increment
    chunk_size: usize,
}

impl Default for DelimitedReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            max_rows: DEFAULT_MAX_ROWS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DelimitedReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Read a delimited file, trying each candidate encoding in order
    pub fn read_path(&self, path: &Path, resolver: &EncodingResolver) -> Result<ReadOutcome> {
        let mut file = File::open(path).map_err(|e| {
            AppError::IoError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let mut prefix = Vec::with_capacity(DETECTION_PREFIX_LEN);
        (&mut file)
            .take(DETECTION_PREFIX_LEN as u64)
            .read_to_end(&mut prefix)?;
        let prefix_len = prefix.len() as u64;

        self.read_with(&prefix, resolver, || {
            let mut rest = File::open(path)?;
            rest.seek(SeekFrom::Start(prefix_len))?;
            Ok(rest)
        })
    }

    /// Read delimited content already held in memory
    pub fn read_bytes(&self, bytes: &[u8], resolver: &EncodingResolver) -> Result<ReadOutcome> {
        let split = bytes.len().min(DETECTION_PREFIX_LEN);
        let (prefix, rest) = bytes.split_at(split);
        self.read_with(prefix, resolver, || Ok(rest))
    }

    /// `open_rest` yields the bytes following `prefix`; it is called once per attempt
    fn read_with<S, F>(
        &self,
        prefix: &[u8],
        resolver: &EncodingResolver,
        mut open_rest: F,
    ) -> Result<ReadOutcome>
    where
        S: Read,
        F: FnMut() -> io::Result<S>,
    {
        let candidates = resolver.candidates(prefix);
        let mut attempted = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            attempted.push(candidate.label());

            let head = strip_bom(prefix, candidate);
            let source = Cursor::new(head).chain(open_rest()?);

            match self.read_candidate(source, candidate) {
                Ok(rows) => {
                    info!(
                        encoding = %candidate,
                        rows = rows.len(),
                        attempts = attempted.len(),
                        "Decoded delimited source"
                    );
                    return Ok(ReadOutcome {
                        table: RawTable::new(rows),
                        encoding: Some(candidate.label()),
                    });
                }
                Err(AttemptFailure::Rejected(reason)) => {
                    warn!(encoding = %candidate, reason = %reason, "Encoding candidate rejected");
                }
                Err(AttemptFailure::Fatal(err)) => return Err(err),
            }
        }

        Err(AppError::DecodingExhausted { attempted })
    }

    /// Parse one full pass under a single encoding, stopping at `max_rows`
    fn read_candidate<S: Read>(
        &self,
        source: S,
        candidate: &EncodingCandidate,
    ) -> std::result::Result<Vec<Vec<Cell>>, AttemptFailure> {
        let decoded = DecodingReader::new(source, candidate.encoding);
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true) // Ragged rows are repaired later
            .from_reader(decoded);

        let mut rows: Vec<Vec<Cell>> = Vec::new();
        let mut chunk: Vec<Vec<Cell>> = Vec::with_capacity(self.chunk_size.min(self.max_rows));
        let mut record = StringRecord::new();
        let mut chunks = 0usize;

        while rows.len() + chunk.len() < self.max_rows {
            match reader.read_record(&mut record) {
                Ok(true) => chunk.push(record.iter().map(Cell::parse).collect()),
                Ok(false) => break,
                Err(err) => return Err(classify_error(err)),
            }

            if chunk.len() == self.chunk_size {
                rows.append(&mut chunk);
                chunks += 1;
                debug!(chunk = chunks, rows = rows.len(), "Accumulated chunk");
            }
        }

        if !chunk.is_empty() {
            rows.append(&mut chunk);
        }
        if rows.len() == self.max_rows {
            debug!(max_rows = self.max_rows, "Row cap reached, stopped reading");
        }

        Ok(rows)
    }
}

fn classify_error(err: csv::Error) -> AttemptFailure {
    match err.into_kind() {
        csv::ErrorKind::Io(io_err) if is_malformed_input(&io_err) => {
            AttemptFailure::Rejected(io_err.to_string())
        }
        csv::ErrorKind::Io(io_err) => AttemptFailure::Fatal(AppError::from(io_err)),
        other => AttemptFailure::Rejected(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn texts(row: &[Cell]) -> Vec<String> {
        row.iter().map(|c| c.render()).collect()
    }

    #[test]
    fn test_reads_ragged_rows_without_header() {
        let reader = DelimitedReader::new();
        let outcome = reader
            .read_bytes(b"a,b,c\n1,2\n3,4,5,6\n", &EncodingResolver::new())
            .unwrap();

        let rows = &outcome.table.rows;
        assert_eq!(rows.len(), 3);
        assert_eq!(texts(&rows[0]), vec!["a", "b", "c"]);
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[2].len(), 4);
        assert!(outcome.table.header.is_none());
    }

    #[test]
    fn test_utf8_bom_does_not_leak_into_first_cell() {
        let outcome = DelimitedReader::new()
            .read_bytes(b"\xEF\xBB\xBFid,name\n1,x\n", &EncodingResolver::new())
            .unwrap();
        assert_eq!(outcome.table.rows[0][0], Cell::Text("id".to_string()));
        assert_eq!(outcome.encoding.as_deref(), Some("UTF-8 (signature)"));
    }

    #[test]
    fn test_utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend("name\tage\nann\t31\n".encode_utf16().flat_map(|u| u.to_le_bytes()));

        let outcome = DelimitedReader::new()
            .with_delimiter(b'\t')
            .read_bytes(&bytes, &EncodingResolver::new())
            .unwrap();
        assert_eq!(texts(&outcome.table.rows[0]), vec!["name", "age"]);
        assert_eq!(outcome.table.rows[1][1], Cell::number(31.0));
    }

    #[test]
    fn test_falls_back_when_utf8_breaks_after_prefix() {
        let mut bytes = "a,b\n".repeat(DETECTION_PREFIX_LEN / 4 + 10).into_bytes();
        bytes.extend_from_slice(b"caf\xE9,1\n");

        let outcome = DelimitedReader::new()
            .read_bytes(&bytes, &EncodingResolver::new())
            .unwrap();
        assert_eq!(outcome.encoding.as_deref(), Some("windows-1252"));
        let last = outcome.table.rows.last().unwrap();
        assert_eq!(last[0], Cell::Text("caf\u{e9}".to_string()));
    }

    #[test]
    fn test_stops_at_row_cap_mid_chunk() {
        let content = "x,y\n".repeat(95);
        let outcome = DelimitedReader::new()
            .with_max_rows(42)
            .with_chunk_size(10)
            .read_bytes(content.as_bytes(), &EncodingResolver::new())
            .unwrap();
        assert_eq!(outcome.table.len(), 42);
    }

    #[test]
    fn test_large_file_is_capped() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for i in 0..250_000 {
            writeln!(file, "{},{}", i, i * 2).unwrap();
        }
        file.flush().unwrap();

        let outcome = DelimitedReader::new()
            .with_max_rows(100_000)
            .with_chunk_size(10_000)
            .read_path(file.path(), &EncodingResolver::new())
            .unwrap();
        assert_eq!(outcome.table.len(), 100_000);
        assert_eq!(outcome.table.rows[99_999][0], Cell::number(99_999.0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = DelimitedReader::new().read_path(
            Path::new("/definitely/not/here.csv"),
            &EncodingResolver::new(),
        );
        assert!(matches!(result, Err(AppError::IoError(_))));
    }
}
