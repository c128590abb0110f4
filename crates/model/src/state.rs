use std::collections::BTreeMap;

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::{
    account::Account,
    encode::Encode,
    error::Error,
    hex::accounts,
    raw::{from_raw, RawResult},
};

/// A snapshot of every account one scenario needs, keyed by address.
///
/// Serializes as a mapping of `0x`-prefixed addresses to accounts. Two spellings of one
/// address are a schema violation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    accounts: BTreeMap<Address, Account>,
}

impl State {
    /// Returns the account at `address`, if present.
    pub fn get(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Iterates over `(address, account)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    /// Iterates over the addresses present in this state.
    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.accounts.keys()
    }

    /// The number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if this state holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Returns a copy of this state with every account's storage cleared.
    pub fn without_storage(&self) -> State {
        self.iter().map(|(address, account)| (*address, account.without_storage())).collect()
    }
}

impl FromIterator<(Address, Account)> for State {
    fn from_iter<T: IntoIterator<Item = (Address, Account)>>(iter: T) -> Self {
        State { accounts: iter.into_iter().collect() }
    }
}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        accounts::serialize(&self.accounts, serializer)
    }
}

impl<'de> Deserialize<'de> for State {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        accounts::deserialize(deserializer).map(|accounts| State { accounts })
    }
}

impl Encode for State {}

/// Parses a state fixture (a mapping of 20-byte addresses to account fixtures) into a
/// [`State`].
pub fn parse_state(raw: &RawResult) -> Result<State, Error> {
    let state: State = from_raw(raw)?;
    trace!(accounts = state.len(), "parsed state");
    Ok(state)
}
