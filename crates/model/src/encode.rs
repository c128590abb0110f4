use std::cell::Cell;

use alloy::primitives::U256;
use serde::Serialize;
use serde_json::Value;

use crate::hex::Word;

/// The shape to render a model value in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// The fixture format: every integer is a minimal `0x`-prefixed hex string.
    Fixture,
    /// The VM interchange format: 256-bit words are `{"low", "high"}` limb pairs, 64-bit
    /// integers are plain JSON numbers.
    Native,
}

thread_local! {
    static ENCODING: Cell<Encoding> = const { Cell::new(Encoding::Fixture) };
}

/// The encoding the `serialize` helpers in [`crate::hex`] render integers in. Plain
/// `serde_json::to_value` renders the fixture format.
pub(crate) fn current_encoding() -> Encoding {
    ENCODING.with(Cell::get)
}

/// Restores the previous encoding on drop.
struct EncodingScope(Encoding);

impl EncodingScope {
    fn enter(encoding: Encoding) -> Self {
        Self(ENCODING.with(|active| active.replace(encoding)))
    }
}

impl Drop for EncodingScope {
    fn drop(&mut self) {
        ENCODING.with(|active| active.set(self.0));
    }
}

/// Renders a model value back into a raw nested mapping. Whatever the encoding, parsing the
/// result yields a value equal to `self`.
pub trait Encode: Serialize {
    /// Renders `self` in the given encoding.
    fn encode(&self, encoding: Encoding) -> Value {
        let _scope = EncodingScope::enter(encoding);
        serde_json::to_value(self).expect("model values have string keys only")
    }

    /// Renders `self` in the fixture format.
    fn to_raw(&self) -> Value {
        self.encode(Encoding::Fixture)
    }

    /// Renders `self` in the VM interchange format.
    fn to_native(&self) -> Value {
        self.encode(Encoding::Native)
    }
}

/// Renders a 256-bit word.
pub fn encode_uint(value: U256, encoding: Encoding) -> Value {
    Word(value).encode(encoding)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_encode_uint() {
        let value = (U256::from(3u8) << 128) + U256::from(0xabde1u64);

        assert_eq!(
            encode_uint(value, Encoding::Fixture),
            json!("0x3000000000000000000000000000abde1")
        );
        assert_eq!(encode_uint(value, Encoding::Native), json!({"low": "0xabde1", "high": "0x3"}));
    }

    #[test]
    fn test_encoding_is_restored() {
        let _ = encode_uint(U256::from(1u8), Encoding::Native);
        assert_eq!(current_encoding(), Encoding::Fixture);
        assert_eq!(serde_json::to_value(Word(U256::from(1u8))).expect("serializes"), json!("0x1"));
    }
}
