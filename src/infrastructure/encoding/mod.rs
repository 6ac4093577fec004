// ============================================================
// ENCODING INFRASTRUCTURE
// ============================================================
// Encoding detection, BOM stripping, and streaming decode

mod bom;
mod decoding_reader;
mod resolver;

pub use bom::strip_bom;
pub use decoding_reader::{is_malformed_input, DecodingReader};
pub use resolver::{
    Detection, DetectionEvidence, EncodingCandidate, EncodingResolver, DETECTION_PREFIX_LEN,
    PERMISSIVE_FALLBACK,
};
