//! # Single-Byte Bridge Strings
//!
//! Token payloads are arbitrary bytes, but ``vocab.json`` keys are strings.
//! Each byte ``b`` is written as the char ``U+00bb`` (ISO-8859-1), which
//! round-trips every byte value exactly.

/// Bridge a payload to its one-char-per-byte string.
pub fn bridge_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Recover the payload of a bridged string.
///
/// ## Returns
/// `None` if any char is above ``U+00FF``.
pub fn unbridge_str(s: &str) -> Option<Vec<u8>> {
    s.chars().map(|c| u8::try_from(c).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_every_byte() {
        let bytes: Vec<u8> = (0..=255).collect();
        let bridged = bridge_bytes(&bytes);
        assert_eq!(bridged.chars().count(), 256);
        assert_eq!(unbridge_str(&bridged), Some(bytes));
    }

    #[test]
    fn test_bridge_utf8_payload() {
        // "é" is 0xC3 0xA9 in UTF-8.
        let bridged = bridge_bytes("é".as_bytes());
        assert_eq!(bridged, "\u{C3}\u{A9}");
        assert_eq!(unbridge_str(&bridged).unwrap(), "é".as_bytes());
    }

    #[test]
    fn test_unbridge_rejects_wide_chars() {
        assert_eq!(unbridge_str("é"), Some(vec![0xE9]));
        assert_eq!(unbridge_str("你"), None);
    }
}
