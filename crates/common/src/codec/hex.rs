use std::fmt::Write;

use crate::error::Error;

/// Removes a leading `0x` or `0X` from the given string, if present.
///
/// ```
/// use mimir_common::codec::strip_hex_prefix;
///
/// assert_eq!(strip_hex_prefix("0xabcd"), "abcd");
/// assert_eq!(strip_hex_prefix("abcd"), "abcd");
/// ```
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

fn nibble(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

/// Decodes a hex string into a vector of bytes. The `0x` prefix is optional, the digit count
/// must be even, and `0x` alone decodes to an empty byte string.
///
/// ```
/// use mimir_common::codec::decode_hex;
///
/// let result = decode_hex("0x48656c6c6f").expect("should decode hex");
/// assert_eq!(result, b"Hello".to_vec());
/// assert!(decode_hex("0x123").is_err());
/// ```
pub fn decode_hex(s: &str) -> Result<Vec<u8>, Error> {
    let digits = strip_hex_prefix(s.trim()).as_bytes();

    if digits.len() % 2 != 0 {
        return Err(Error::malformed(s, "odd number of hex digits"));
    }

    digits
        .chunks(2)
        .map(|pair| match (nibble(pair[0]), nibble(pair[1])) {
            (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
            _ => Err(Error::malformed(s, "invalid hex digit")),
        })
        .collect()
}

/// Decodes a hex string into exactly `N` bytes.
///
/// ```
/// use mimir_common::codec::decode_hex_fixed;
///
/// let address: [u8; 2] = decode_hex_fixed("0xc0de").expect("should decode hex");
/// assert_eq!(address, [0xc0, 0xde]);
/// assert!(decode_hex_fixed::<2>("0xc0dec0de").is_err());
/// ```
pub fn decode_hex_fixed<const N: usize>(s: &str) -> Result<[u8; N], Error> {
    let bytes = decode_hex(s)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        Error::malformed(s, format!("expected {N} bytes, found {}", bytes.len()))
    })
}

/// Encodes a slice of bytes into a lowercase hex string, without prefix.
///
/// ```
/// use mimir_common::codec::encode_hex;
///
/// assert_eq!(encode_hex(b"Hello"), "48656c6c6f");
/// ```
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

/// Encodes a slice of bytes into a `0x`-prefixed lowercase hex string, the format fixtures use
/// for byte-valued fields.
///
/// ```
/// use mimir_common::codec::encode_prefixed;
///
/// assert_eq!(encode_prefixed(&[]), "0x");
/// assert_eq!(encode_prefixed(&[0x00, 0x0a]), "0x000a");
/// ```
pub fn encode_prefixed(bytes: &[u8]) -> String {
    format!("0x{}", encode_hex(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_accepts_missing_prefix() {
        assert_eq!(decode_hex("c0de").expect("should decode"), vec![0xc0, 0xde]);
        assert_eq!(decode_hex("0XC0DE").expect("should decode"), vec![0xc0, 0xde]);
    }

    #[test]
    fn test_decode_hex_empty() {
        assert!(decode_hex("0x").expect("should decode").is_empty());
        assert!(decode_hex("").expect("should decode").is_empty());
    }

    #[test]
    fn test_decode_hex_rejects_invalid_digits() {
        // `from_str_radix` would happily accept a sign here
        assert!(matches!(decode_hex("0x+f"), Err(Error::MalformedHex { .. })));
        assert!(decode_hex("0xzz").is_err());
        assert!(decode_hex("0xé0").is_err());
    }

    #[test]
    fn test_decode_hex_fixed_reports_width() {
        let err = decode_hex_fixed::<20>("0xc0de").expect_err("should reject short input");
        assert_eq!(err.to_string(), "malformed hex '0xc0de': expected 20 bytes, found 2");
    }

    #[test]
    fn test_encode_decode_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(decode_hex(&encode_prefixed(&bytes)).expect("should decode"), bytes);
    }
}
