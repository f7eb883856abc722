//! Encoding detection and decoding of raw input with UTF-8 fallback logic.
//!
//! Input arrives as bytes from files, stdin, or HTTP bodies. Decoding:
//! - BOM detection (UTF-8, UTF-16 LE/BE)
//! - UTF-8 fast-path with strict validation
//! - Fallback encoding detection using chardetng
//! - Replacement characters as a last resort

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::io::Read;

const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Detect the encoding of a byte buffer.
///
/// Strategy:
/// 1. Check for BOM markers first (most reliable)
/// 2. Try strict UTF-8 decoding of a sample
/// 3. Fall back to chardetng for everything else
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    if valid_utf8_prefix(sample, sample.len() < bytes.len()) {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}

/// A sample cut from a larger buffer may end mid-character, so when
/// `truncated` is set an incomplete final sequence still counts as UTF-8.
fn valid_utf8_prefix(sample: &[u8], truncated: bool) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(e) => truncated && e.error_len().is_none(),
    }
}

/// Decode bytes to a string, stripping any BOM.
pub fn decode(bytes: &[u8]) -> String {
    // Fast path: most input is UTF-8
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.strip_prefix('\u{feff}').unwrap_or(text).to_string();
    }

    let encoding = detect_encoding(bytes);
    tracing::debug!("decoding input as {}", encoding.name());
    let (decoded, _used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!("input contained invalid {} sequences", encoding.name());
    }
    decoded.into_owned()
}

/// Detect if a buffer is binary (not text).
///
/// Uses two heuristics:
/// 1. Null byte check (strong binary indicator)
/// 2. Ratio of printable ASCII bytes (< 70% = likely binary)
///
/// UTF-16 input is full of null bytes, so a UTF-16 BOM means text.
pub fn is_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    if sample.is_empty() {
        return false;
    }
    if matches!(Encoding::for_bom(sample), Some((enc, _)) if enc == UTF_16LE || enc == UTF_16BE) {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    if std::str::from_utf8(sample).is_ok() {
        return false;
    }

    let printable_count = sample
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b == 9 || b == 10 || b == 13 || b >= 0x80)
        .count();
    (printable_count as f64 / sample.len() as f64) < 0.70
}

/// Read all of `reader` and decode it.
pub fn read_to_string(mut reader: impl Read) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(decode(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8() {
        assert_eq!(detect_encoding("Hello, world!".as_bytes()), UTF_8);
    }

    #[test]
    fn test_detect_utf16_bom() {
        assert_eq!(detect_encoding(&[0xff, 0xfe, b'h', 0]), UTF_16LE);
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let mut bytes = vec![0xef, 0xbb, 0xbf];
        bytes.extend_from_slice("Hello".as_bytes());
        assert_eq!(decode(&bytes), "Hello");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "café" in windows-1252
        let decoded = decode(&[b'c', b'a', b'f', 0xe9]);
        assert_eq!(decoded, "café");
    }

    #[test]
    fn test_detect_utf8_split_at_sample_boundary() {
        let mut bytes = vec![b'a'; DEFAULT_SAMPLE_SIZE - 1];
        bytes.extend_from_slice("é tail".as_bytes());
        assert_eq!(detect_encoding(&bytes), UTF_8);
        assert!(!valid_utf8_prefix(&[b'c', b'a', b'f', 0xe9], false));
    }

    #[test]
    fn test_is_binary_null_byte() {
        assert!(is_binary(&[0x00, 0x01, 0x02]));
        assert!(!is_binary("Normal text file".as_bytes()));
    }

    #[test]
    fn test_read_to_string_utf16() {
        let mut bytes = vec![0xff, 0xfe];
        for unit in "hi 🚀".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(read_to_string(&bytes[..]).unwrap(), "hi 🚀");
    }
}
