//! Binary/text sniffing of uploaded documents.

/// Only the head of the document is inspected.
pub const SNIFF_LIMIT: usize = 1024;

/// Percentage of non-textual bytes above which a document is binary.
const BINARY_THRESHOLD: usize = 95;

/// Returns true when `data` looks like a binary document.
///
/// Any byte below 0x09 makes the document binary. Otherwise tab, line feed,
/// form feed, carriage return and printable ASCII count as textual; the
/// document is binary when more than 95% of the inspected bytes are not.
pub fn is_binary(data: &[u8]) -> bool {
    let head = &data[..data.len().min(SNIFF_LIMIT)];

    let mut textual = 0usize;
    let mut other = 0usize;
    for &b in head {
        match b {
            0x00..=0x08 => return true,
            0x09 | 0x0A | 0x0C | 0x0D | 0x20..=0x7E => textual += 1,
            _ => other += 1,
        }
    }

    other > 0 && 100 * other / (textual + other) > BINARY_THRESHOLD
}
