use encoding_rs::Encoding;

use super::EncodingCandidate;

/// Remove a leading byte-order mark that belongs to the candidate's encoding.
///
/// A BOM is only consumed by signature-aware candidates, and only when it
/// names exactly the candidate encoding. Everything else is returned as-is.
pub fn strip_bom(bytes: &[u8], candidate: &EncodingCandidate) -> Vec<u8> {
    if !candidate.consume_signature {
        return bytes.to_vec();
    }

    match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == candidate.encoding => bytes[bom_len..].to_vec(),
        _ => bytes.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

    #[test]
    fn test_strips_utf8_signature() {
        let stripped = strip_bom(
            b"\xEF\xBB\xBFid,name",
            &EncodingCandidate::signature_aware(UTF_8),
        );
        assert_eq!(stripped, b"id,name");
    }

    #[test]
    fn test_strips_utf16_signatures() {
        let le = strip_bom(b"\xFF\xFEa\x00", &EncodingCandidate::signature_aware(UTF_16LE));
        assert_eq!(le, b"a\x00");

        let be = strip_bom(b"\xFE\xFF\x00a", &EncodingCandidate::signature_aware(UTF_16BE));
        assert_eq!(be, b"\x00a");
    }

    #[test]
    fn test_keeps_signature_of_other_family() {
        let bytes = b"\xFF\xFEa\x00";
        assert_eq!(
            strip_bom(bytes, &EncodingCandidate::signature_aware(UTF_8)),
            bytes.to_vec()
        );
        assert_eq!(
            strip_bom(bytes, &EncodingCandidate::signature_aware(UTF_16BE)),
            bytes.to_vec()
        );
    }

    #[test]
    fn test_plain_candidate_keeps_bytes() {
        let bytes = b"\xEF\xBB\xBFid";
        assert_eq!(
            strip_bom(bytes, &EncodingCandidate::plain(WINDOWS_1252)),
            bytes.to_vec()
        );
        assert_eq!(strip_bom(b"", &EncodingCandidate::signature_aware(UTF_8)), b"");
    }
}
