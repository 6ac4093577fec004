// ============================================================
// INGEST CONFIGURATION
// ============================================================
// Options recognized by the ingestion pipeline

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Default hard cap on rows held in a table
pub const DEFAULT_MAX_ROWS: usize = 100_000;

/// Default number of rows read per increment from delimited sources
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Which worksheet to read from a spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl std::fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetSelector::Index(idx) => write!(f, "#{}", idx),
            SheetSelector::Name(name) => write!(f, "{:?}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "a", alias = "asc")]
    Ascending,
    #[serde(alias = "d", alias = "desc")]
    Descending,
}

/// Sort target: a 0-based column position plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: usize,

    #[serde(default)]
    pub direction: SortDirection,
}

/// How the normalizer decides whether the first row is a header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Promote the first row only when every cell holds a value
    #[default]
    Infer,

    /// Treat every row as data; columns get positional names
    Never,

    /// Always promote the first row; null cells get positional names
    Always,
}

/// Configuration for one ingestion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct IngestConfig {
    /// Hard cap on the resulting row count (default: 100,000)
    #[validate(range(min = 1))]
    pub max_rows: usize,

    /// Rows per read increment for delimited sources (default: 10,000)
    #[validate(range(min = 1))]
    pub chunk_size: usize,

    /// Worksheet selector for spreadsheet sources (default: first sheet)
    pub sheet: SheetSelector,

    pub header: HeaderPolicy,

    pub sort: Option<SortSpec>,

    /// Regular expression matched against every cell rendered as text
    #[serde(deserialize_with = "optional_text")]
    pub pattern: Option<String>,

    /// Number of rows to draw at random after filtering
    pub sample_size: Option<usize>,

    /// Seed for a reproducible sample
    pub sample_seed: Option<u64>,

    /// Encoding label tried before anything detected
    #[serde(deserialize_with = "optional_text")]
    pub encoding: Option<String>,

    /// Extra encoding labels tried after the detected encoding
    #[serde(deserialize_with = "text_list")]
    pub fallback_encodings: Vec<String>,
}

/// A scalar read as text. Environment providers parse `404` or `true`
/// into typed values, but these options are always strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(text) => text,
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Signed(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Scalar>),
    One(Scalar),
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items.into_iter().map(String::from).collect(),
        OneOrMany::One(item) => vec![String::from(item)],
    })
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            sheet: SheetSelector::default(),
            header: HeaderPolicy::default(),
            sort: None,
            pattern: None,
            sample_size: None,
            sample_seed: None,
            encoding: None,
            fallback_encodings: Vec::new(),
        }
    }
}

impl IngestConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_sort(mut self, column: usize, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec { column, direction });
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_sample(mut self, sample_size: usize, seed: Option<u64>) -> Self {
        self.sample_size = Some(sample_size);
        self.sample_seed = seed;
        self
    }

    pub fn with_header(mut self, header: HeaderPolicy) -> Self {
        self.header = header;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = IngestConfig::default();
        assert_eq!(config.max_rows, 100_000);
        assert_eq!(config.chunk_size, 10_000);
        assert_eq!(config.sheet, SheetSelector::Index(0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_caps_are_rejected() {
        assert!(IngestConfig::default().with_max_rows(0).validate().is_err());
        assert!(IngestConfig::default().with_chunk_size(0).validate().is_err());
    }
}
