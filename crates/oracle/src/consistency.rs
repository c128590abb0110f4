//! Internal consistency of block fixtures: the parsed fields against the block's own `rlp`.

use mimir_model::{rlp::decode_block, Block, Transaction};
use tracing::debug;

use crate::{
    equivalence::{Equivalent, StorageMode},
    error::{Error, Mismatch},
};

fn check(mismatch: Option<Mismatch>) -> Result<(), Error> {
    mismatch.map_or(Ok(()), |mismatch| Err(Error::EquivalenceMismatch(mismatch)))
}

/// Verifies that the header hash recorded in `block` is the keccak256 of the header as encoded
/// in `block.rlp`.
pub fn verify_header_hash(block: &Block) -> Result<(), Error> {
    let decoded = decode_block(&block.rlp)?;
    check(block.header.hash.first_difference(
        &decoded.header.hash,
        "blockHeader.hash",
        StorageMode::Exact,
    ))
}

/// Verifies that decoding `block.rlp` yields exactly the parsed header, transactions, uncle
/// headers and withdrawals.
///
/// Senders are not encoded in RLP; each decoded transaction takes the sender of the parsed
/// transaction at the same index.
pub fn verify_block_rlp(block: &Block) -> Result<(), Error> {
    let decoded = decode_block(&block.rlp)?;

    check(block.header.first_difference(&decoded.header, "blockHeader", StorageMode::Exact))?;

    if block.transactions.len() != decoded.transactions.len() {
        return Err(Mismatch::new(
            "transactions.length",
            block.transactions.len().to_string(),
            decoded.transactions.len().to_string(),
        )
        .into());
    }
    let transactions: Vec<Transaction> = decoded
        .transactions
        .into_iter()
        .zip(&block.transactions)
        .map(|(decoded, parsed)| decoded.with_sender(parsed.sender))
        .collect();

    check(block.transactions.first_difference(&transactions, "transactions", StorageMode::Exact))?;
    check(block.uncle_headers.first_difference(
        &decoded.uncle_headers,
        "uncleHeaders",
        StorageMode::Exact,
    ))?;
    check(block.withdrawals.first_difference(
        &decoded.withdrawals,
        "withdrawals",
        StorageMode::Exact,
    ))?;

    debug!(number = block.header.number, "block rlp agrees with its fields");
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;
    use mimir_model::{fixtures, parse_block};

    use super::*;

    #[test]
    fn test_consistent_block_verifies() {
        let block = parse_block(&fixtures::consistent_block()).expect("fixture parses");

        verify_header_hash(&block).expect("hash agrees");
        verify_block_rlp(&block).expect("rlp agrees");
    }

    #[test]
    fn test_duplicated_transaction_is_reported() {
        let block = parse_block(&fixtures::block()).expect("fixture parses");

        let Err(Error::EquivalenceMismatch(mismatch)) = verify_block_rlp(&block) else {
            panic!("expected a mismatch");
        };
        assert_eq!(mismatch, Mismatch::new("transactions.length", "2", "1"));
    }

    #[test]
    fn test_tampered_header_is_reported() {
        let mut block = parse_block(&fixtures::consistent_block()).expect("fixture parses");
        block.header.gas_used += 1;

        let Err(Error::EquivalenceMismatch(mismatch)) = verify_block_rlp(&block) else {
            panic!("expected a mismatch");
        };
        assert_eq!(mismatch.field, "blockHeader.gasUsed");
    }

    #[test]
    fn test_tampered_hash_is_reported() {
        let mut block = parse_block(&fixtures::consistent_block()).expect("fixture parses");
        block.header.hash = Default::default();

        let Err(Error::EquivalenceMismatch(mismatch)) = verify_header_hash(&block) else {
            panic!("expected a mismatch");
        };
        assert_eq!(mismatch.field, "blockHeader.hash");
        assert_eq!(mismatch.expected, format!("0x{}", "0".repeat(64)));
    }

    #[test]
    fn test_tampered_transaction_is_reported() {
        let mut block = parse_block(&fixtures::consistent_block()).expect("fixture parses");
        block.transactions[0].value += U256::from(1);

        let Err(Error::EquivalenceMismatch(mismatch)) = verify_block_rlp(&block) else {
            panic!("expected a mismatch");
        };
        assert_eq!(mismatch.field, "transactions[0].value");
    }

    #[test]
    fn test_corrupt_rlp_is_a_model_error() {
        let mut block = parse_block(&fixtures::consistent_block()).expect("fixture parses");
        block.rlp = block.rlp[..10].to_vec().into();

        assert!(matches!(verify_block_rlp(&block), Err(Error::Model(_))));
    }
}
