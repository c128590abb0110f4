//! Serde helpers for hex-encoded fields, for use with `#[serde(with = "...")]`.
//!
//! Integers deserialize from a hex string, a JSON integer or a `{"low", "high"}` limb pair
//! whose limbs are hex strings or integers. Byte strings must be hex strings. Integers
//! serialize in the active [`Encoding`]; byte strings are hex in every encoding.

use std::{collections::BTreeMap, fmt};

use alloy::primitives::{Address, Bloom, Bytes, FixedBytes, B256, B64, U256};
use mimir_common::codec::{
    decode_hex, encode_prefixed, hex_to_uint, limb_pair_to_uint, uint_to_hex, uint_to_limb_pair,
};
use serde::{
    de::{self, IgnoredAny, IntoDeserializer, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{
    account::{Account, Storage},
    encode::{current_encoding, Encode, Encoding},
};

/// Prefix of every undecodable-hex message. [`crate::Error`] strips it again to tell
/// `MalformedHex` apart from `SchemaViolation`.
pub(crate) const MALFORMED_HEX: &str = "malformed hex: ";

fn malformed<E: de::Error>(source: mimir_common::Error) -> E {
    E::custom(format_args!("{MALFORMED_HEX}{source}"))
}

/// A 256-bit word, in any of the integer shapes a VM may hand back.
///
/// ```
/// use mimir_model::{from_raw, hex::Word};
/// use serde_json::json;
///
/// let expected = Word(alloy::primitives::U256::from(0xabde1u64));
/// assert_eq!(from_raw::<Word>(&json!("0xabde1")).unwrap(), expected);
/// assert_eq!(from_raw::<Word>(&json!(0xabde1)).unwrap(), expected);
/// assert_eq!(from_raw::<Word>(&json!({"low": "0xabde1", "high": 0})).unwrap(), expected);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(#[serde(with = "uint")] pub U256);

impl Encode for Word {}

struct UintVisitor {
    limbs: bool,
}

impl<'de> Visitor<'de> for UintVisitor {
    type Value = U256;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.limbs {
            f.write_str("an integer as hex, a number or a limb pair")
        } else {
            f.write_str("a limb as hex or a number")
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<U256, E> {
        hex_to_uint(v).map_err(malformed)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<U256, E> {
        Ok(U256::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<U256, E> {
        u64::try_from(v)
            .map(U256::from)
            .map_err(|_| E::custom(format_args!("{v} is not an unsigned integer")))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<U256, A::Error> {
        if !self.limbs {
            return Err(de::Error::invalid_type(de::Unexpected::Map, &self));
        }

        let (mut low, mut high) = (None, None);
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "low" => low = Some(map.next_value::<Limb>()?.0),
                "high" => high = Some(map.next_value::<Limb>()?.0),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let low = low.ok_or_else(|| de::Error::missing_field("low"))?;
        let high = high.ok_or_else(|| de::Error::missing_field("high"))?;
        Ok(limb_pair_to_uint(low, high))
    }
}

/// One half of a limb pair.
struct Limb(u128);

impl<'de> Deserialize<'de> for Limb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pair = uint_to_limb_pair(deserializer.deserialize_any(UintVisitor { limbs: false })?);
        if pair.high != 0 {
            return Err(de::Error::custom("limb exceeds 128 bits"));
        }
        Ok(Limb(pair.low))
    }
}

struct BytesVisitor;

impl Visitor<'_> for BytesVisitor {
    type Value = Vec<u8>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a hex string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Vec<u8>, E> {
        decode_hex(v).map_err(malformed)
    }
}

/// 256-bit integers: minimal hex in fixtures, limb pairs for the VM.
pub mod uint {
    use super::*;

    /// Serializes `value` in the active encoding.
    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        match current_encoding() {
            Encoding::Fixture => serializer.serialize_str(&uint_to_hex(*value)),
            Encoding::Native => uint_to_limb_pair(*value).serialize(serializer),
        }
    }

    /// Deserializes a hex string, a JSON integer or a limb pair.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        deserializer.deserialize_any(UintVisitor { limbs: true })
    }
}

/// Integers that fit in 64 bits: minimal hex in fixtures, JSON numbers for the VM.
pub mod quantity {
    use super::*;

    /// Serializes `value` in the active encoding.
    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        match current_encoding() {
            Encoding::Fixture => serializer.serialize_str(&uint_to_hex(U256::from(*value))),
            Encoding::Native => serializer.serialize_u64(*value),
        }
    }

    /// Deserializes any integer shape, rejecting values wider than 64 bits.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let wide = uint::deserialize(deserializer)?;
        if wide > U256::from(u64::MAX) {
            return Err(de::Error::custom(format_args!("{wide} does not fit in 64 bits")));
        }
        Ok(wide.as_limbs()[0])
    }
}

/// Byte strings of any length.
pub mod bytes {
    use super::*;

    /// Serializes `value` as `0x`-prefixed hex.
    pub fn serialize<S: Serializer>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_prefixed(value))
    }

    /// Deserializes a hex string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        deserializer.deserialize_str(BytesVisitor).map(Bytes::from)
    }
}

/// Byte strings of a fixed width.
pub trait FixedHex: Sized {
    /// The width, in bytes.
    const LEN: usize;

    /// Builds a value from exactly [`Self::LEN`] bytes.
    fn from_hex_bytes(bytes: &[u8]) -> Self;

    /// The raw bytes.
    fn hex_bytes(&self) -> &[u8];
}

macro_rules! fixed_hex {
    ($($ty:ty => $len:literal),* $(,)?) => {
        $(
            impl FixedHex for $ty {
                const LEN: usize = $len;

                fn from_hex_bytes(bytes: &[u8]) -> Self {
                    Self::from(FixedBytes::<$len>::from_slice(bytes))
                }

                fn hex_bytes(&self) -> &[u8] {
                    self.as_slice()
                }
            }
        )*
    };
}

fixed_hex!(B64 => 8, Address => 20, B256 => 32, Bloom => 256);

fn check_width<T: FixedHex, E: de::Error>(bytes: Vec<u8>) -> Result<T, E> {
    if bytes.len() != T::LEN {
        return Err(E::custom(format_args!("expected {} bytes, found {}", T::LEN, bytes.len())));
    }
    Ok(T::from_hex_bytes(&bytes))
}

/// Fixed-width byte strings: hashes, addresses, blooms and nonces.
pub mod fixed {
    use super::*;

    /// Serializes `value` as `0x`-prefixed hex.
    pub fn serialize<S: Serializer, T: FixedHex>(
        value: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_prefixed(value.hex_bytes()))
    }

    /// Deserializes a hex string of exactly `T::LEN` bytes.
    pub fn deserialize<'de, D: Deserializer<'de>, T: FixedHex>(
        deserializer: D,
    ) -> Result<T, D::Error> {
        check_width(deserializer.deserialize_str(BytesVisitor)?)
    }
}

struct Uint(U256);

impl<'de> Deserialize<'de> for Uint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        uint::deserialize(deserializer).map(Uint)
    }
}

struct Quantity(u64);

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        quantity::deserialize(deserializer).map(Quantity)
    }
}

struct Fixed<T>(T);

impl<'de, T: FixedHex> Deserialize<'de> for Fixed<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        fixed::deserialize(deserializer).map(Fixed)
    }
}

/// Optional 256-bit integers. `null` reads as absent.
pub mod opt_uint {
    use super::*;

    /// Serializes a present value like [`uint`](super::uint).
    pub fn serialize<S: Serializer>(
        value: &Option<U256>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => uint::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes `null` or any integer shape.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<U256>, D::Error> {
        Ok(Option::<Uint>::deserialize(deserializer)?.map(|Uint(value)| value))
    }
}

/// Optional 64-bit integers. `null` reads as absent.
pub mod opt_quantity {
    use super::*;

    /// Serializes a present value like [`quantity`](super::quantity).
    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => quantity::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes `null` or an integer that fits in 64 bits.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        Ok(Option::<Quantity>::deserialize(deserializer)?.map(|Quantity(value)| value))
    }
}

/// Optional fixed-width byte strings. `null` reads as absent.
pub mod opt_fixed {
    use super::*;

    /// Serializes a present value like [`fixed`](super::fixed).
    pub fn serialize<S: Serializer, T: FixedHex>(
        value: &Option<T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => fixed::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes `null` or a hex string of exactly `T::LEN` bytes.
    pub fn deserialize<'de, D: Deserializer<'de>, T: FixedHex>(
        deserializer: D,
    ) -> Result<Option<T>, D::Error> {
        Ok(Option::<Fixed<T>>::deserialize(deserializer)?.map(|Fixed(value)| value))
    }
}

/// Transaction recipients. Contract creation is written as `null`, `""` or `"0x"`, and
/// serializes as `"0x"`.
pub mod recipient {
    use super::*;

    /// Serializes the recipient, or `0x` for contract creation.
    pub fn serialize<S: Serializer>(
        value: &Option<Address>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(to) => fixed::serialize(to, serializer),
            None => serializer.serialize_str("0x"),
        }
    }

    /// Deserializes a 20-byte address, or contract creation.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Address>, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("" | "0x") => Ok(None),
            Some(to) => fixed::deserialize(to.into_deserializer()).map(Some),
        }
    }
}

/// Contract storage, keyed by minimal hex. Two spellings of one slot (`0x1` and `0x01`) are
/// rejected.
pub mod storage {
    use super::*;

    /// Serializes `storage` with minimal hex keys.
    pub fn serialize<S: Serializer>(storage: &Storage, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(storage.len()))?;
        for (slot, value) in storage {
            map.serialize_entry(&uint_to_hex(*slot), &Word(*value))?;
        }
        map.end()
    }

    /// Deserializes a mapping of hex slots to integers.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Storage, D::Error> {
        deserializer.deserialize_map(StorageVisitor)
    }

    struct StorageVisitor;

    impl<'de> Visitor<'de> for StorageVisitor {
        type Value = Storage;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of storage slots to values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Storage, A::Error> {
            let mut storage = Storage::new();
            while let Some(key) = map.next_key::<String>()? {
                let slot = hex_to_uint(&key).map_err(malformed::<A::Error>)?;
                let Word(value) = map.next_value()?;

                if storage.insert(slot, value).is_some() {
                    return Err(de::Error::custom(format_args!(
                        "duplicate storage key {}",
                        uint_to_hex(slot)
                    )));
                }
            }
            Ok(storage)
        }
    }
}

/// Accounts keyed by 20-byte address. Two spellings of one address are rejected.
pub(crate) mod accounts {
    use super::*;

    pub(crate) fn serialize<S: Serializer>(
        accounts: &BTreeMap<Address, Account>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(accounts.len()))?;
        for (address, account) in accounts {
            map.serialize_entry(&encode_prefixed(address.as_slice()), account)?;
        }
        map.end()
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Address, Account>, D::Error> {
        deserializer.deserialize_map(AccountsVisitor)
    }

    struct AccountsVisitor;

    impl<'de> Visitor<'de> for AccountsVisitor {
        type Value = BTreeMap<Address, Account>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of addresses to accounts")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut accounts = BTreeMap::new();
            while let Some(key) = map.next_key::<String>()? {
                let address = parse_address::<A::Error>(&key)?;
                let account = map.next_value()?;

                if accounts.insert(address, account).is_some() {
                    return Err(de::Error::custom(format_args!("duplicate address {address}")));
                }
            }
            Ok(accounts)
        }
    }
}

/// Parses a mapping key holding a 20-byte address. The key is named in the error, since a
/// key that fails to parse has no field path of its own.
pub(crate) fn parse_address<E: de::Error>(key: &str) -> Result<Address, E> {
    let bytes = decode_hex(key).map_err(malformed)?;
    check_width::<Address, E>(bytes)
        .map_err(|e| E::custom(format_args!("invalid address '{key}': {e}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{error::Error, from_raw};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "quantity")]
        nonce: u64,
        #[serde(default, with = "opt_fixed", skip_serializing_if = "Option::is_none")]
        root: Option<B256>,
        #[serde(default, with = "recipient")]
        to: Option<Address>,
    }

    impl Encode for Sample {}

    #[test]
    fn test_word_shapes() {
        let value = U256::from(1u8) << 200;
        let pair = uint_to_limb_pair(value);

        let as_limbs =
            json!({"low": format!("{:#x}", pair.low), "high": format!("{:#x}", pair.high)});
        assert_eq!(from_raw::<Word>(&as_limbs).expect("should parse"), Word(value));
        assert_eq!(from_raw::<Word>(&json!("0x00")).expect("should parse"), Word(U256::ZERO));
        assert_eq!(from_raw::<Word>(&json!(7)).expect("should parse"), Word(U256::from(7u8)));
    }

    #[test]
    fn test_word_rejects_bad_shapes() {
        assert!(matches!(from_raw::<Word>(&json!(-1)), Err(Error::SchemaViolation { .. })));
        assert!(matches!(from_raw::<Word>(&json!(true)), Err(Error::SchemaViolation { .. })));
        assert!(matches!(from_raw::<Word>(&json!(1.5)), Err(Error::SchemaViolation { .. })));
        assert!(matches!(from_raw::<Word>(&json!("0xzz")), Err(Error::MalformedHex { .. })));

        let nested = json!({"low": {"low": "0x1", "high": "0x0"}, "high": "0x0"});
        assert!(matches!(from_raw::<Word>(&nested), Err(Error::SchemaViolation { .. })));
    }

    #[test]
    fn test_limb_errors_name_the_limb() {
        let wide_limb = json!({"low": format!("0x1{}", "0".repeat(32)), "high": "0x0"});
        let err = from_raw::<Word>(&wide_limb).expect_err("limb is too wide");
        assert_eq!(err.to_string(), "schema violation at 'low': limb exceeds 128 bits");

        let err = from_raw::<Word>(&json!({"low": "0x1"})).expect_err("high is missing");
        assert_eq!(err.to_string(), "schema violation at 'high': missing required field");
    }

    #[test]
    fn test_quantity_width() {
        assert!(from_raw::<Sample>(&json!({"nonce": "0x10000000000000000"})).is_err());

        let sample = from_raw::<Sample>(&json!({"nonce": "0xffffffffffffffff"}))
            .expect("should parse");
        assert_eq!(sample.nonce, u64::MAX);
    }

    #[test]
    fn test_optional_fields() {
        let sample = from_raw::<Sample>(&json!({"nonce": 1, "root": null, "to": "0x"}))
            .expect("should parse");
        assert_eq!(sample, Sample { nonce: 1, root: None, to: None });

        let err = from_raw::<Sample>(&json!({"nonce": 1, "root": "0xc0de"}))
            .expect_err("root is too short");
        assert_eq!(err.to_string(), "schema violation at 'root': expected 32 bytes, found 2");
    }

    #[test]
    fn test_encodings() {
        let sample = Sample { nonce: 0x0f4240, root: Some(B256::ZERO), to: None };

        assert_eq!(
            sample.to_raw(),
            json!({"nonce": "0xf4240", "root": format!("0x{}", "00".repeat(32)), "to": "0x"})
        );
        assert_eq!(sample.to_native()["nonce"], json!(1_000_000));
        assert_eq!(
            Word(U256::from(0xabde1u64)).to_native(),
            json!({"low": "0xabde1", "high": "0x0"})
        );
    }

    #[test]
    fn test_parse_address_names_the_key() {
        let err = parse_address::<serde_json::Error>("0xc0de").expect_err("too short");
        assert_eq!(err.to_string(), "invalid address '0xc0de': expected 20 bytes, found 2");
    }
}
