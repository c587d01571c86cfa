//! Plain-text decoding
//!
//! UTF-8 first, Latin-1 as a fallback for legacy exports.

use crate::errors::IngestionError;

/// Decode uploaded TXT bytes into a string.
pub fn decode_text(bytes: &[u8]) -> Result<String, IngestionError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_string()),
        Err(_) => {
            // Latin-1: every byte maps directly to the code point of the
            // same value, so this cannot fail.
            tracing::debug!(len = bytes.len(), "TXT is not UTF-8, decoding as Latin-1");
            Ok(bytes.iter().map(|&b| b as char).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8() {
        let text = decode_text("héllo".as_bytes()).unwrap();
        assert_eq!(text, "héllo");
    }

    #[test]
    fn test_latin1_fallback() {
        // 0xE9 is 'é' in Latin-1 but invalid standalone UTF-8
        let text = decode_text(&[b'h', 0xE9, b'l', b'l', b'o']).unwrap();
        assert_eq!(text, "héllo");
    }
}
