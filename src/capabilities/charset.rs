//! Default charset detection.
//!
//! UTF-8 when the bytes are valid UTF-8 (a leading BOM is dropped),
//! ISO-8859-1 otherwise. Latin-1 maps every byte to the code point of the
//! same value, so decoding never fails.

use crate::capabilities::{CapabilityError, CharsetDetector};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCharsetDetector;

impl CharsetDetector for DefaultCharsetDetector {
    fn decode(&self, bytes: &[u8]) -> Result<String, CapabilityError> {
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        match std::str::from_utf8(body) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => {
                tracing::debug!("Document is not UTF-8, decoding as ISO-8859-1");
                Ok(body.iter().map(|&b| char::from(b)).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_with_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("<a>é</a>".as_bytes());
        assert_eq!(DefaultCharsetDetector.decode(&bytes).unwrap(), "<a>é</a>");
    }

    #[test]
    fn test_latin1_fallback() {
        let bytes = b"<a>\xe9t\xe9</a>";
        assert_eq!(DefaultCharsetDetector.decode(bytes).unwrap(), "<a>été</a>");
    }
}
