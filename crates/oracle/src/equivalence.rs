//! Structural equality over the canonical model, with a depth-first diff reporting the
//! first field that differs.

use std::collections::BTreeSet;

use alloy::primitives::{Address, Bloom, Bytes, B256, B64, U256};
use mimir_common::codec::{encode_prefixed, uint_to_hex, uint_to_limb_pair, LimbPair};
use mimir_model::{Account, Block, BlockHeader, State, Transaction, Withdrawal};

use crate::error::{Error, Mismatch};

/// How contract storage is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageMode {
    /// Only the number of slots and the multiset of stored values must agree. Slot keys are
    /// ignored, since the VM under test reports storage keyed by hashed slot.
    #[default]
    ValuesOnly,
    /// Keys and values must agree exactly.
    Exact,
}

/// Structural equality over the canonical model, reporting where two values first diverge.
pub trait Equivalent {
    /// Returns the first field, depth-first, at which `self` (the reference) and `actual`
    /// differ. `path` is the dotted path of `self` within the value being compared.
    fn first_difference(&self, actual: &Self, path: &str, mode: StorageMode) -> Option<Mismatch>;
}

/// Appends a field name to a dotted path.
pub(crate) fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

/// Renders a leaf value the way fixtures write it, for mismatch reports.
pub trait Render {
    /// The rendered value.
    fn render(&self) -> String;
}

impl Render for U256 {
    fn render(&self) -> String {
        uint_to_hex(*self)
    }
}

impl Render for u64 {
    fn render(&self) -> String {
        uint_to_hex(U256::from(*self))
    }
}

macro_rules! render_bytes {
    ($($ty:ty),*) => {
        $(
            impl Render for $ty {
                fn render(&self) -> String {
                    encode_prefixed(&self[..])
                }
            }
        )*
    };
}

render_bytes!(Address, Bloom, Bytes, B256, B64);

macro_rules! leaf {
    ($($ty:ty),*) => {
        $(
            impl Equivalent for $ty {
                fn first_difference(
                    &self,
                    actual: &Self,
                    path: &str,
                    _mode: StorageMode,
                ) -> Option<Mismatch> {
                    (self != actual).then(|| Mismatch::new(path, self.render(), actual.render()))
                }
            }
        )*
    };
}

leaf!(U256, u64, Address, Bloom, Bytes, B256, B64);

impl<T: Equivalent + Render> Equivalent for Option<T> {
    fn first_difference(&self, actual: &Self, path: &str, mode: StorageMode) -> Option<Mismatch> {
        match (self, actual) {
            (Some(expected), Some(actual)) => expected.first_difference(actual, path, mode),
            (None, None) => None,
            (Some(expected), None) => Some(Mismatch::new(path, expected.render(), "absent")),
            (None, Some(actual)) => Some(Mismatch::new(path, "absent", actual.render())),
        }
    }
}

impl<T: Equivalent> Equivalent for Vec<T> {
    fn first_difference(&self, actual: &Self, path: &str, mode: StorageMode) -> Option<Mismatch> {
        if self.len() != actual.len() {
            return Some(Mismatch::new(
                join(path, "length"),
                self.len().to_string(),
                actual.len().to_string(),
            ));
        }

        self.iter()
            .zip(actual)
            .enumerate()
            .find_map(|(i, (expected, actual))| {
                expected.first_difference(actual, &format!("{path}[{i}]"), mode)
            })
    }
}

/// Compares named fields in order, stopping at the first difference.
macro_rules! fields {
    (
        $expected:ident, $actual:ident, $path:ident, $mode:ident,
        { $($name:literal => $field:ident),* $(,)? }
    ) => {
        None $(.or_else(|| {
            $expected.$field.first_difference(&$actual.$field, &join($path, $name), $mode)
        }))*
    };
}

impl Equivalent for BlockHeader {
    fn first_difference(&self, actual: &Self, path: &str, mode: StorageMode) -> Option<Mismatch> {
        fields!(self, actual, path, mode, {
            "parentHash" => parent_hash,
            "uncleHash" => uncle_hash,
            "coinbase" => coinbase,
            "stateRoot" => state_root,
            "transactionsTrie" => transactions_trie,
            "receiptTrie" => receipt_trie,
            "bloom" => bloom,
            "difficulty" => difficulty,
            "number" => number,
            "gasLimit" => gas_limit,
            "gasUsed" => gas_used,
            "timestamp" => timestamp,
            "extraData" => extra_data,
            "mixHash" => mix_hash,
            "nonce" => nonce,
            "baseFeePerGas" => base_fee_per_gas,
            "withdrawalsRoot" => withdrawals_root,
            "blobGasUsed" => blob_gas_used,
            "excessBlobGas" => excess_blob_gas,
            "parentBeaconBlockRoot" => parent_beacon_block_root,
            "requestsHash" => requests_hash,
            "hash" => hash,
        })
    }
}

impl Equivalent for Transaction {
    fn first_difference(&self, actual: &Self, path: &str, mode: StorageMode) -> Option<Mismatch> {
        fields!(self, actual, path, mode, {
            "nonce" => nonce,
            "gasPrice" => gas_price,
            "gasLimit" => gas_limit,
            "to" => to,
            "value" => value,
            "data" => data,
            "v" => v,
            "r" => r,
            "s" => s,
            "sender" => sender,
        })
    }
}

impl Equivalent for Withdrawal {
    fn first_difference(&self, actual: &Self, path: &str, mode: StorageMode) -> Option<Mismatch> {
        fields!(self, actual, path, mode, {
            "index" => index,
            "validatorIndex" => validator_index,
            "address" => address,
            "amount" => amount,
        })
    }
}

impl Equivalent for Block {
    fn first_difference(&self, actual: &Self, path: &str, mode: StorageMode) -> Option<Mismatch> {
        fields!(self, actual, path, mode, {
            "blockHeader" => header,
            "transactions" => transactions,
            "uncleHeaders" => uncle_headers,
            "withdrawals" => withdrawals,
            "rlp" => rlp,
        })
    }
}

impl Equivalent for Account {
    fn first_difference(&self, actual: &Self, path: &str, mode: StorageMode) -> Option<Mismatch> {
        fields!(self, actual, path, mode, {
            "balance" => balance,
            "nonce" => nonce,
            "code" => code,
        })
        .or_else(|| {
            let path = join(path, "storage");
            match mode {
                StorageMode::ValuesOnly => storage_values_difference(
                    self.storage.values().copied(),
                    actual.storage.values().copied(),
                    &path,
                ),
                StorageMode::Exact => storage_difference(self, actual, &path),
            }
        })
    }
}

fn storage_difference(expected: &Account, actual: &Account, path: &str) -> Option<Mismatch> {
    let missing = expected.storage.iter().find_map(|(key, value)| {
        let field = format!("{path}[{}]", uint_to_hex(*key));
        match actual.storage.get(key) {
            None => Some(Mismatch::new(field, value.render(), "absent")),
            Some(found) => value.first_difference(found, &field, StorageMode::Exact),
        }
    });

    missing.or_else(|| {
        actual.storage.iter().find(|(key, _)| !expected.storage.contains_key(key)).map(
            |(key, value)| {
                Mismatch::new(format!("{path}[{}]", uint_to_hex(*key)), "absent", value.render())
            },
        )
    })
}

/// Compares two storage value multisets: cardinality first, then the sorted limb pairs.
pub(crate) fn storage_values_difference(
    expected: impl IntoIterator<Item = U256>,
    actual: impl IntoIterator<Item = U256>,
    path: &str,
) -> Option<Mismatch> {
    let mut expected: Vec<LimbPair> = expected.into_iter().map(uint_to_limb_pair).collect();
    let mut actual: Vec<LimbPair> = actual.into_iter().map(uint_to_limb_pair).collect();

    if expected.len() != actual.len() {
        return Some(Mismatch::new(
            path,
            format!("{} entries", expected.len()),
            format!("{} entries", actual.len()),
        ));
    }

    expected.sort_unstable();
    actual.sort_unstable();
    (expected != actual).then(|| {
        Mismatch::new(join(path, "values"), render_limbs(&expected), render_limbs(&actual))
    })
}

fn render_limbs(values: &[LimbPair]) -> String {
    let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

impl Equivalent for State {
    fn first_difference(&self, actual: &Self, path: &str, mode: StorageMode) -> Option<Mismatch> {
        let expected_addresses: BTreeSet<Address> = self.addresses().copied().collect();
        let actual_addresses: BTreeSet<Address> = actual.addresses().copied().collect();
        address_set_difference(&expected_addresses, &actual_addresses, path).or_else(|| {
            self.iter().find_map(|(address, expected)| {
                let found = actual.get(address)?;
                expected.first_difference(found, &account_path(path, address), mode)
            })
        })
    }
}

/// Accounts are addressed by their lowercase, prefixed address.
pub(crate) fn account_path(path: &str, address: &Address) -> String {
    join(path, &encode_prefixed(address.as_slice()))
}

/// Compares two sets of account addresses: cardinality first, then membership.
pub(crate) fn address_set_difference(
    expected: &BTreeSet<Address>,
    actual: &BTreeSet<Address>,
    path: &str,
) -> Option<Mismatch> {
    if expected.len() != actual.len() {
        return Some(Mismatch::new(
            join(path, "accounts"),
            format!("{} accounts", expected.len()),
            format!("{} accounts", actual.len()),
        ));
    }

    expected
        .difference(actual)
        .next()
        .map(|address| Mismatch::new(account_path(path, address), "present", "absent"))
        .or_else(|| {
            actual.difference(expected).next().map(|address| {
                Mismatch::new(account_path(path, address), "absent", "present")
            })
        })
}

/// Returns the first difference between `expected` and `actual`, if any.
pub fn diff<T: Equivalent>(expected: &T, actual: &T, mode: StorageMode) -> Option<Mismatch> {
    expected.first_difference(actual, "", mode)
}

/// Structural equality, comparing storage by its value multiset.
pub fn equal<T: Equivalent>(a: &T, b: &T) -> bool {
    diff(a, b, StorageMode::ValuesOnly).is_none()
}

/// Structural equality, comparing storage key by key.
pub fn equal_exact<T: Equivalent>(a: &T, b: &T) -> bool {
    diff(a, b, StorageMode::Exact).is_none()
}

/// Fails with [`Error::EquivalenceMismatch`] at the first difference between `expected` and
/// `actual`.
pub fn assert_equivalent<T: Equivalent>(
    expected: &T,
    actual: &T,
    mode: StorageMode,
) -> Result<(), Error> {
    match diff(expected, actual, mode) {
        Some(mismatch) => Err(Error::EquivalenceMismatch(mismatch)),
        None => Ok(()),
    }
}
