use std::fmt;

use alloy::primitives::U256;
use serde::{ser::SerializeStruct, Serialize, Serializer};

use super::hex::{encode_hex, strip_hex_prefix};
use crate::error::Error;

/// An unsigned 256-bit integer.
pub type Uint256 = U256;

/// A 256-bit integer split into two 128-bit halves, such that `value = high * 2^128 + low`.
///
/// This is the shape in which constrained-arithmetic VMs exchange 256-bit words, since their
/// native field elements cannot hold a full word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LimbPair {
    /// The least significant 128 bits.
    pub low: u128,
    /// The most significant 128 bits.
    pub high: u128,
}

impl LimbPair {
    /// Creates a new limb pair.
    pub const fn new(low: u128, high: u128) -> Self {
        Self { low, high }
    }

    /// Recombines the limbs into a [`Uint256`].
    pub fn to_uint(self) -> Uint256 {
        limb_pair_to_uint(self.low, self.high)
    }
}

impl From<Uint256> for LimbPair {
    fn from(value: Uint256) -> Self {
        uint_to_limb_pair(value)
    }
}

impl From<LimbPair> for Uint256 {
    fn from(pair: LimbPair) -> Self {
        pair.to_uint()
    }
}

/// Limb pairs serialize as `{"low": "0x..", "high": "0x.."}`, the VM interchange shape.
impl Serialize for LimbPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_struct("LimbPair", 2)?;
        pair.serialize_field("low", &format!("{:#x}", self.low))?;
        pair.serialize_field("high", &format!("{:#x}", self.high))?;
        pair.end()
    }
}

impl fmt::Display for LimbPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(low: {:#x}, high: {:#x})", self.low, self.high)
    }
}

/// Parses a hex string into a [`Uint256`].
///
/// The `0x` prefix is optional and the digit count may be odd. `0x` alone parses to zero.
/// Leading zeros are ignored, so the only width limit is the value itself: anything that needs
/// more than 256 bits is rejected.
///
/// ```
/// use mimir_common::codec::{hex_to_uint, Uint256};
///
/// assert_eq!(hex_to_uint("0xabde1").expect("should parse"), Uint256::from(0xabde1u64));
/// assert!(hex_to_uint("0xnot-hex").is_err());
/// ```
pub fn hex_to_uint(s: &str) -> Result<Uint256, Error> {
    let digits = strip_hex_prefix(s.trim());

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::malformed(s, "invalid hex digit"));
    }

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(Uint256::ZERO);
    }
    if significant.len() > 64 {
        return Err(Error::malformed(s, "value exceeds 256 bits"));
    }

    Uint256::from_str_radix(significant, 16).map_err(|e| Error::malformed(s, e.to_string()))
}

/// Splits a [`Uint256`] into its (low, high) limb pair.
///
/// ```
/// use mimir_common::codec::{uint_to_limb_pair, Uint256};
///
/// let pair = uint_to_limb_pair(Uint256::from(1u8) << 128);
/// assert_eq!((pair.low, pair.high), (0, 1));
/// ```
pub fn uint_to_limb_pair(value: Uint256) -> LimbPair {
    let limbs = value.as_limbs();
    LimbPair {
        low: (limbs[0] as u128) | ((limbs[1] as u128) << 64),
        high: (limbs[2] as u128) | ((limbs[3] as u128) << 64),
    }
}

/// Recombines a (low, high) limb pair into a [`Uint256`]. Exact inverse of
/// [`uint_to_limb_pair`].
pub fn limb_pair_to_uint(low: u128, high: u128) -> Uint256 {
    Uint256::from_limbs([low as u64, (low >> 64) as u64, high as u64, (high >> 64) as u64])
}

/// Formats a [`Uint256`] as minimal, lowercase, `0x`-prefixed hex. Zero formats as `0x0`.
///
/// ```
/// use mimir_common::codec::{uint_to_hex, Uint256};
///
/// assert_eq!(uint_to_hex(Uint256::ZERO), "0x0");
/// assert_eq!(uint_to_hex(Uint256::from(0x0f4240u64)), "0xf4240");
/// ```
pub fn uint_to_hex(value: Uint256) -> String {
    let digits = encode_hex(&value.to_be_bytes::<32>());
    let trimmed = digits.trim_start_matches('0');

    if trimmed.is_empty() {
        String::from("0x0")
    } else {
        format!("0x{trimmed}")
    }
}

/// Normalizes an integer hex string to its minimal form.
///
/// ```
/// use mimir_common::codec::normalize_hex;
///
/// assert_eq!(normalize_hex("0x000a").expect("should parse"), "0xa");
/// assert_eq!(normalize_hex("0x00").expect("should parse"), "0x0");
/// ```
pub fn normalize_hex(s: &str) -> Result<String, Error> {
    hex_to_uint(s).map(uint_to_hex)
}
