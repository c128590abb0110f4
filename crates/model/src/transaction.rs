use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{encode::Encode, hex};

/// A signed legacy transaction, as found in a block fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Sender nonce.
    #[serde(with = "hex::quantity")]
    pub nonce: u64,
    /// Gas price, in wei.
    #[serde(with = "hex::uint")]
    pub gas_price: U256,
    /// Gas limit.
    #[serde(with = "hex::quantity")]
    pub gas_limit: u64,
    /// Recipient, or `None` for contract creation.
    #[serde(default, with = "hex::recipient")]
    pub to: Option<Address>,
    /// Transferred value, in wei.
    #[serde(with = "hex::uint")]
    pub value: U256,
    /// Call data, or init code for contract creation.
    #[serde(with = "hex::bytes")]
    pub data: Bytes,
    /// Signature recovery id / parity (possibly EIP-155 encoded).
    #[serde(with = "hex::quantity")]
    pub v: u64,
    /// Signature `r` component.
    #[serde(with = "hex::uint")]
    pub r: U256,
    /// Signature `s` component.
    #[serde(with = "hex::uint")]
    pub s: U256,
    /// Recovered sender address.
    #[serde(with = "hex::fixed")]
    pub sender: Address,
}

impl Encode for Transaction {}

impl Transaction {
    /// Returns true if this transaction creates a contract.
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }
}
