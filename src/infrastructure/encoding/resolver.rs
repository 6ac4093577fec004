// ============================================================
// ENCODING RESOLVER
// ============================================================
// Detect a probable encoding and build the ordered candidate list

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use tracing::{debug, warn};

/// Bytes inspected during detection
pub const DETECTION_PREFIX_LEN: usize = 64 * 1024;

/// Share of code units that must carry a zero byte in one lane to call UTF-16
const UTF16_ZERO_LANE_RATIO: f32 = 0.3;

/// How many times more zeros the dominant lane needs than the other lane
const UTF16_LANE_DOMINANCE: usize = 4;

/// Encoding that maps every byte to a character, so decoding never fails
pub const PERMISSIVE_FALLBACK: &Encoding = WINDOWS_1252;

/// What decided the detected encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionEvidence {
    ByteOrderMark,
    Utf16ZeroPattern,
    ValidUtf8,
    SingleByteFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub encoding: &'static Encoding,
    pub evidence: DetectionEvidence,
}

/// One encoding to attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingCandidate {
    pub encoding: &'static Encoding,

    /// Whether a leading byte-order mark of this encoding is consumed
    pub consume_signature: bool,
}

impl EncodingCandidate {
    pub fn plain(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            consume_signature: false,
        }
    }

    /// The signature-aware variant for UTF-8 and UTF-16 families
    pub fn signature_aware(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            consume_signature: is_unicode_family(encoding),
        }
    }

    pub fn label(&self) -> String {
        if self.consume_signature {
            format!("{} (signature)", self.encoding.name())
        } else {
            self.encoding.name().to_string()
        }
    }
}

impl std::fmt::Display for EncodingCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

fn is_unicode_family(encoding: &'static Encoding) -> bool {
    encoding == UTF_8 || encoding == UTF_16LE || encoding == UTF_16BE
}

/// Builds ordered encoding candidate lists from raw bytes
#[derive(Debug, Clone, Default)]
pub struct EncodingResolver {
    /// Label tried before anything detected
    forced: Option<String>,

    /// Labels tried after the detected encoding
    fallbacks: Vec<String>,
}

impl EncodingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_forced(mut self, label: Option<String>) -> Self {
        self.forced = label;
        self
    }

    pub fn with_fallbacks(mut self, labels: Vec<String>) -> Self {
        self.fallbacks = labels;
        self
    }

    /// Guess the encoding of `bytes` from at most `DETECTION_PREFIX_LEN` leading bytes
    pub fn detect(bytes: &[u8]) -> Detection {
        let prefix = &bytes[..bytes.len().min(DETECTION_PREFIX_LEN)];

        if let Some((encoding, _)) = Encoding::for_bom(prefix) {
            return Detection {
                encoding,
                evidence: DetectionEvidence::ByteOrderMark,
            };
        }

        let lanes = ZeroLanes::count(prefix);
        if let Some(encoding) = lanes.dominant() {
            return Detection {
                encoding,
                evidence: DetectionEvidence::Utf16ZeroPattern,
            };
        }

        // NUL bytes are valid UTF-8 but almost never appear in UTF-8 text,
        // so any lane imbalance wins over the UTF-8 check
        if let Some(encoding) = lanes.majority() {
            return Detection {
                encoding,
                evidence: DetectionEvidence::Utf16ZeroPattern,
            };
        }

        if is_valid_utf8_prefix(prefix, prefix.len() < bytes.len()) {
            return Detection {
                encoding: UTF_8,
                evidence: DetectionEvidence::ValidUtf8,
            };
        }

        Detection {
            encoding: PERMISSIVE_FALLBACK,
            evidence: DetectionEvidence::SingleByteFallback,
        }
    }

    /// Ordered, de-duplicated candidates; always ends with the permissive fallback
    pub fn candidates(&self, bytes: &[u8]) -> Vec<EncodingCandidate> {
        let detection = Self::detect(bytes);
        debug!(
            encoding = detection.encoding.name(),
            evidence = ?detection.evidence,
            "Detected encoding"
        );

        let mut ordered = Vec::new();
        if let Some(encoding) = self.forced.as_deref().and_then(resolve_label) {
            ordered.push(EncodingCandidate::signature_aware(encoding));
        }
        ordered.push(EncodingCandidate::signature_aware(detection.encoding));
        ordered.extend(
            self.fallbacks
                .iter()
                .filter_map(|label| resolve_label(label))
                .map(EncodingCandidate::signature_aware),
        );
        ordered.push(EncodingCandidate::signature_aware(UTF_8));
        ordered.push(EncodingCandidate::plain(PERMISSIVE_FALLBACK));

        // Nothing after the permissive fallback can ever be reached
        let mut candidates: Vec<EncodingCandidate> = Vec::with_capacity(ordered.len());
        for candidate in ordered {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
            if candidate.encoding == PERMISSIVE_FALLBACK {
                break;
            }
        }
        candidates
    }
}

fn resolve_label(label: &str) -> Option<&'static Encoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes());
    if encoding.is_none() {
        warn!(label = label, "Ignoring unknown encoding label");
    }
    encoding
}

/// Zero bytes per lane of 2-byte code units.
/// ASCII in UTF-16LE puts its zero in the odd lane; UTF-16BE in the even lane.
#[derive(Debug, Clone, Copy, Default)]
struct ZeroLanes {
    units: usize,
    even: usize,
    odd: usize,
}

impl ZeroLanes {
    fn count(prefix: &[u8]) -> Self {
        let mut lanes = ZeroLanes {
            units: prefix.len() / 2,
            ..Default::default()
        };
        for pair in prefix.chunks_exact(2) {
            if pair[0] == 0 {
                lanes.even += 1;
            }
            if pair[1] == 0 {
                lanes.odd += 1;
            }
        }
        lanes
    }

    /// One lane holds enough zeros and clearly outweighs the other
    fn dominant(&self) -> Option<&'static Encoding> {
        if self.units < 2 {
            return None;
        }

        let threshold = ((self.units as f32 * UTF16_ZERO_LANE_RATIO).ceil() as usize).max(1);
        if self.odd >= threshold && self.odd >= UTF16_LANE_DOMINANCE * self.even {
            Some(UTF_16LE)
        } else if self.even >= threshold && self.even >= UTF16_LANE_DOMINANCE * self.odd {
            Some(UTF_16BE)
        } else {
            None
        }
    }

    fn majority(&self) -> Option<&'static Encoding> {
        if self.units < 2 {
            return None;
        }

        match self.odd.cmp(&self.even) {
            std::cmp::Ordering::Greater => Some(UTF_16LE),
            std::cmp::Ordering::Less => Some(UTF_16BE),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// `truncated` means the prefix was cut from a longer input, so a partial
/// sequence at the very end is not evidence against UTF-8.
fn is_valid_utf8_prefix(prefix: &[u8], truncated: bool) -> bool {
    match std::str::from_utf8(prefix) {
        Ok(_) => true,
        Err(err) => truncated && err.error_len().is_none(),
    }
}
