//! Two-phase verification of VM round-trip results.
//!
//! The VM under test reports storage keyed by hashed slot, so storage cannot be compared key
//! by key. Results are first checked on their storage values alone (cardinality, then the
//! sorted multiset of limb pairs), and only then parsed and compared structurally with
//! storage cleared on both sides.

use std::collections::{BTreeMap, BTreeSet};

use alloy::primitives::Address;
use mimir_model::{
    from_raw_at, hex::Word, parse_account, parse_state, raw::parse_address_key, Account,
    RawResult, State,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    equivalence::{
        account_path, address_set_difference, assert_equivalent, join, storage_values_difference,
        StorageMode,
    },
    error::{Error, Mismatch},
};

fn schema(path: &str, reason: impl Into<String>) -> Error {
    let (path, reason) = (path.to_string(), reason.into());
    Error::Model(mimir_model::Error::SchemaViolation { path, reason })
}

fn mapping<'a>(raw: &'a Value, path: &str) -> Result<&'a Map<String, Value>, Error> {
    raw.as_object().ok_or_else(|| schema(path, "expected a mapping"))
}

/// The stored values of a raw account, keyed by whatever the VM keyed them by.
#[derive(Debug, Deserialize)]
struct StoredValues {
    storage: BTreeMap<String, Word>,
}

/// Reads the stored values out of a raw account, ignoring their keys.
fn storage_values(raw: &Value, path: &str) -> Result<Vec<Word>, Error> {
    let StoredValues { storage } = from_raw_at(raw, path)?;
    Ok(storage.into_values().collect())
}

/// Replaces every storage mapping found at `accounts` with an empty one.
fn clear_storage<'a>(accounts: impl Iterator<Item = &'a mut Value>) {
    for account in accounts {
        if let Some(map) = account.as_object_mut() {
            map.insert("storage".to_string(), Value::Object(Map::new()));
        }
    }
}

fn check_storage_values(expected: &Account, raw: &Value, path: &str) -> Result<(), Error> {
    let actual = storage_values(raw, path)?;
    match storage_values_difference(
        expected.storage.values().copied(),
        actual.into_iter().map(|Word(value)| value),
        &join(path, "storage"),
    ) {
        Some(mismatch) => Err(Error::EquivalenceMismatch(mismatch)),
        None => Ok(()),
    }
}

/// Verifies that `raw`, an account returned by the VM, is equivalent to `expected`.
///
/// Storage is compared by value only; every other field must match exactly.
pub fn verify_account_round_trip(expected: &Account, raw: &RawResult) -> Result<(), Error> {
    check_storage_values(expected, raw, "")?;
    debug!(slots = expected.storage.len(), "account storage values agree");

    let mut stripped = raw.clone();
    clear_storage(std::iter::once(&mut stripped));
    let actual = parse_account(&stripped)?;

    assert_equivalent(&expected.without_storage(), &actual, StorageMode::Exact)
}

/// Verifies that `raw`, a state returned by the VM, is equivalent to `expected`.
///
/// The address sets must agree, every account's storage must agree by value, and every other
/// field must match exactly.
pub fn verify_state_round_trip(expected: &State, raw: &RawResult) -> Result<(), Error> {
    let accounts = mapping(raw, "")?;

    let mut by_address: BTreeMap<Address, &Value> = BTreeMap::new();
    for (key, value) in accounts {
        let address = parse_address_key(key, key)?;
        if by_address.insert(address, value).is_some() {
            return Err(schema(key, format!("duplicate address {address}")));
        }
    }

    let expected_addresses: BTreeSet<Address> = expected.addresses().copied().collect();
    let actual_addresses: BTreeSet<Address> = by_address.keys().copied().collect();
    if let Some(mismatch) = address_set_difference(&expected_addresses, &actual_addresses, "") {
        return Err(Error::EquivalenceMismatch(mismatch));
    }

    for (address, account) in expected.iter() {
        let raw_account = by_address
            .get(address)
            .ok_or_else(|| Mismatch::new(account_path("", address), "present", "absent"))?;
        check_storage_values(account, raw_account, &account_path("", address))?;
    }
    debug!(accounts = expected.len(), "state storage values agree");

    let mut stripped = raw.clone();
    if let Some(map) = stripped.as_object_mut() {
        clear_storage(map.values_mut());
    }
    let actual = parse_state(&stripped)?;

    assert_equivalent(&expected.without_storage(), &actual, StorageMode::Exact)
}
