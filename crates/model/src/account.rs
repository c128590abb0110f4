use std::collections::BTreeMap;

use alloy::primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    encode::Encode,
    error::Error,
    hex,
    raw::{from_raw, RawResult},
};

/// Contract storage: 256-bit keys to 256-bit values.
pub type Storage = BTreeMap<U256, U256>;

/// An account in the global state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Balance, in wei.
    #[serde(with = "hex::uint")]
    pub balance: U256,
    /// Account nonce.
    #[serde(with = "hex::quantity")]
    pub nonce: u64,
    /// Contract code, empty for externally owned accounts.
    #[serde(with = "hex::bytes")]
    pub code: Bytes,
    /// Contract storage. Two spellings of the same slot (`0x1` and `0x01`) are a schema
    /// violation.
    #[serde(with = "hex::storage")]
    pub storage: Storage,
}

impl Encode for Account {}

impl Account {
    /// Returns true if this is the "empty account": no code, zero nonce, zero balance and no
    /// storage. Empty accounts are still kept when a fixture lists them explicitly.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.nonce == 0 && self.balance.is_zero() && self.storage.is_empty()
    }

    /// Returns a copy of this account with its storage cleared.
    pub fn without_storage(&self) -> Account {
        Account { storage: Storage::new(), ..self.clone() }
    }
}

/// Parses an account fixture (`balance`, `nonce`, `code`, `storage`) into an [`Account`].
pub fn parse_account(raw: &RawResult) -> Result<Account, Error> {
    let account: Account = from_raw(raw)?;
    trace!(nonce = account.nonce, slots = account.storage.len(), "parsed account");
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;

    #[test]
    fn test_parse_fixture_account() {
        let account = parse_account(&fixtures::account()).expect("should parse");

        assert_eq!(account.nonce, 1);
        assert_eq!(account.balance, U256::ZERO);
        assert_eq!(account.code.len(), 141);
        assert_eq!(account.storage.get(&U256::from(1u8)), Some(&U256::from(0xabde1u64)));
        assert!(!account.is_empty());
    }

    #[test]
    fn test_empty_account() {
        let raw = json!({"balance": "0x00", "code": "0x", "nonce": "0x00", "storage": {}});
        let account = parse_account(&raw).expect("should parse");

        assert!(account.is_empty());
        assert_eq!(account, Account::default());
    }

    #[test]
    fn test_duplicate_storage_key() {
        let raw = json!({
            "balance": "0x00",
            "code": "0x",
            "nonce": "0x00",
            "storage": {"0x1": "0x01", "0x01": "0x02"},
        });

        let err = parse_account(&raw).expect_err("0x1 and 0x01 are the same slot");
        assert_eq!(
            err.to_string(),
            "schema violation at 'storage': duplicate storage key 0x1"
        );
    }

    #[test]
    fn test_storage_key_too_wide() {
        let key = format!("0x1{}", "0".repeat(64));
        let raw =
            json!({"balance": "0x00", "code": "0x", "nonce": "0x00", "storage": {key: "0x1"}});

        assert!(matches!(parse_account(&raw), Err(Error::MalformedHex { .. })));
    }

    #[test]
    fn test_storage_value_path() {
        let raw = json!({
            "balance": "0x00",
            "code": "0x",
            "nonce": "0x00",
            "storage": {"0x1": {"low": "0x1"}},
        });

        let err = parse_account(&raw).expect_err("limb is missing");
        assert_eq!(
            err.to_string(),
            "schema violation at 'storage.0x1.high': missing required field"
        );
    }

    #[test]
    fn test_missing_storage() {
        let raw = json!({"balance": "0x00", "code": "0x", "nonce": "0x00"});

        let err = parse_account(&raw).expect_err("storage is required");
        assert_eq!(err.to_string(), "schema violation at 'storage': missing required field");
    }

    #[test]
    fn test_account_encodings_reparse() {
        let account = parse_account(&fixtures::account()).expect("should parse");

        assert_eq!(parse_account(&account.to_raw()).expect("should parse"), account);
        assert_eq!(parse_account(&account.to_native()).expect("should parse"), account);
        assert_eq!(account.to_native()["storage"]["0x1"], json!({"low": "0xabde1", "high": "0x0"}));
    }
}
