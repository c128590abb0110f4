use alloy::primitives::{Address, Bloom, Bytes, B256, B64, U256};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    encode::Encode,
    error::Error,
    hex,
    raw::{from_raw, RawResult},
    transaction::Transaction,
};

/// A block header.
///
/// Fields introduced by a hard fork after Frontier are optional; `None` means the block
/// predates the fork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    /// Hash of the parent block.
    #[serde(with = "hex::fixed")]
    pub parent_hash: B256,
    /// Hash of the RLP encoded uncle list.
    #[serde(with = "hex::fixed")]
    pub uncle_hash: B256,
    /// Beneficiary of the block rewards.
    #[serde(with = "hex::fixed")]
    pub coinbase: Address,
    /// State trie root after the block.
    #[serde(with = "hex::fixed")]
    pub state_root: B256,
    /// Transaction trie root.
    #[serde(with = "hex::fixed")]
    pub transactions_trie: B256,
    /// Receipt trie root.
    #[serde(with = "hex::fixed")]
    pub receipt_trie: B256,
    /// Logs bloom filter.
    #[serde(with = "hex::fixed")]
    pub bloom: Bloom,
    /// Proof-of-work difficulty, zero after the merge.
    #[serde(with = "hex::uint")]
    pub difficulty: U256,
    /// Block number.
    #[serde(with = "hex::quantity")]
    pub number: u64,
    /// Gas limit.
    #[serde(with = "hex::quantity")]
    pub gas_limit: u64,
    /// Gas used by all transactions.
    #[serde(with = "hex::quantity")]
    pub gas_used: u64,
    /// Unix timestamp.
    #[serde(with = "hex::quantity")]
    pub timestamp: u64,
    /// Arbitrary extra data.
    #[serde(with = "hex::bytes")]
    pub extra_data: Bytes,
    /// Mix hash, or `prevRandao` after the merge.
    #[serde(with = "hex::fixed")]
    pub mix_hash: B256,
    /// Proof-of-work nonce.
    #[serde(with = "hex::fixed")]
    pub nonce: B64,
    /// EIP-1559 base fee.
    #[serde(default, with = "hex::opt_uint", skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<U256>,
    /// EIP-4895 withdrawals trie root.
    #[serde(default, with = "hex::opt_fixed", skip_serializing_if = "Option::is_none")]
    pub withdrawals_root: Option<B256>,
    /// EIP-4844 blob gas used.
    #[serde(default, with = "hex::opt_quantity", skip_serializing_if = "Option::is_none")]
    pub blob_gas_used: Option<u64>,
    /// EIP-4844 excess blob gas.
    #[serde(default, with = "hex::opt_quantity", skip_serializing_if = "Option::is_none")]
    pub excess_blob_gas: Option<u64>,
    /// EIP-4788 parent beacon block root.
    #[serde(default, with = "hex::opt_fixed", skip_serializing_if = "Option::is_none")]
    pub parent_beacon_block_root: Option<B256>,
    /// EIP-7685 requests hash.
    #[serde(default, with = "hex::opt_fixed", skip_serializing_if = "Option::is_none")]
    pub requests_hash: Option<B256>,
    /// Hash of the RLP encoded header.
    #[serde(with = "hex::fixed")]
    pub hash: B256,
}

impl Encode for BlockHeader {}

/// A validator withdrawal (EIP-4895).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    /// Monotonic withdrawal index.
    #[serde(with = "hex::quantity")]
    pub index: u64,
    /// Index of the withdrawing validator.
    #[serde(with = "hex::quantity")]
    pub validator_index: u64,
    /// Recipient of the withdrawn amount.
    #[serde(with = "hex::fixed")]
    pub address: Address,
    /// Withdrawn amount, in gwei.
    #[serde(with = "hex::quantity")]
    pub amount: u64,
}

impl Encode for Withdrawal {}

/// A full block: header, body and the canonical RLP serialization of both.
///
/// `uncleHeaders` and `withdrawals` may be omitted, in which case they are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// The block header.
    #[serde(rename = "blockHeader")]
    pub header: BlockHeader,
    /// Transactions, in block order.
    pub transactions: Vec<Transaction>,
    /// Uncle headers, in block order.
    #[serde(default)]
    pub uncle_headers: Vec<BlockHeader>,
    /// Withdrawals, in block order.
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
    /// RLP encoding of the whole block.
    #[serde(with = "hex::bytes")]
    pub rlp: Bytes,
}

impl Encode for Block {}

/// Parses a block fixture (`blockHeader`, `transactions`, `uncleHeaders`, `withdrawals`,
/// `rlp`) into a [`Block`].
///
/// Parsing checks field presence and width only; agreement between the header and `rlp` is
/// verified separately by the oracle.
pub fn parse_block(raw: &RawResult) -> Result<Block, Error> {
    let block: Block = from_raw(raw)?;

    trace!(
        number = block.header.number,
        transactions = block.transactions.len(),
        "parsed block"
    );
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;

    #[test]
    fn test_parse_fixture_block() {
        let block = parse_block(&fixtures::block()).expect("should parse");

        assert_eq!(block.header.number, 1);
        assert_eq!(block.header.gas_limit, 0x0f4240);
        assert_eq!(block.header.gas_used, 0x0156f8);
        assert_eq!(block.header.base_fee_per_gas, Some(U256::from(10u8)));
        assert_eq!(block.header.extra_data, Bytes::from(vec![0u8]));
        assert_eq!(block.transactions.len(), 2);
        assert!(block.uncle_headers.is_empty());
        assert!(block.withdrawals.is_empty());
        assert_eq!(block.rlp.len(), 777);
    }

    #[test]
    fn test_parse_block_short_bloom() {
        let mut raw = fixtures::block();
        raw["blockHeader"]["bloom"] = json!(format!("0x{}", "00".repeat(255)));

        let err = parse_block(&raw).expect_err("bloom is one byte short");
        assert_eq!(
            err.to_string(),
            "schema violation at 'blockHeader.bloom': expected 256 bytes, found 255"
        );
    }

    #[test]
    fn test_parse_block_missing_field() {
        let mut raw = fixtures::block();
        raw["transactions"][1]
            .as_object_mut()
            .expect("transaction is a mapping")
            .remove("gasPrice");

        let err = parse_block(&raw).expect_err("gasPrice is required");
        assert_eq!(
            err.to_string(),
            "schema violation at 'transactions[1].gasPrice': missing required field"
        );
    }

    #[test]
    fn test_parse_pre_cancun_header() {
        let mut raw = fixtures::block();
        let header = raw["blockHeader"].as_object_mut().expect("header is a mapping");
        for name in ["blobGasUsed", "excessBlobGas", "parentBeaconBlockRoot", "withdrawalsRoot"] {
            header.remove(name);
        }
        raw.as_object_mut().expect("block is a mapping").remove("withdrawals");

        let block = parse_block(&raw).expect("should parse");
        assert_eq!(block.header.blob_gas_used, None);
        assert_eq!(block.header.parent_beacon_block_root, None);
        assert!(block.withdrawals.is_empty());
    }

    #[test]
    fn test_parse_withdrawals_and_uncles() {
        let mut raw = fixtures::block();
        let uncle = raw["blockHeader"].clone();
        raw["uncleHeaders"] = json!([uncle]);
        raw["withdrawals"] = json!([{
            "index": "0x00",
            "validatorIndex": "0x2a",
            "address": "0x000000000000000000000000000000000000c0de",
            "amount": "0x0de0b6b3a7640000",
        }]);

        let block = parse_block(&raw).expect("should parse");
        assert_eq!(block.uncle_headers, vec![block.header.clone()]);
        assert_eq!(block.withdrawals[0].validator_index, 42);
        assert_eq!(block.withdrawals[0].amount, 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_block_encodings_reparse() {
        let block = parse_block(&fixtures::block()).expect("should parse");

        assert_eq!(parse_block(&block.to_raw()).expect("should parse"), block);
        assert_eq!(parse_block(&block.to_native()).expect("should parse"), block);
    }
}
