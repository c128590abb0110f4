//! The numeric codec converts between hex strings, byte strings, 256-bit integers and the
//! (low, high) 128-bit limb pairs used by constrained-arithmetic execution environments.

/// Byte-string hex encoding and decoding.
pub mod hex;

/// 256-bit integers and their limb pair decomposition.
pub mod uint256;

pub use hex::{decode_hex, decode_hex_fixed, encode_hex, encode_prefixed, strip_hex_prefix};
pub use uint256::{
    hex_to_uint, limb_pair_to_uint, normalize_hex, uint_to_hex, uint_to_limb_pair, LimbPair,
    Uint256,
};
