//! Decoding of block RLP into the canonical model.
//!
//! Only what the oracle needs to check a fixture's `rlp` against its parsed fields: the
//! header (with its hash recomputed from the encoded bytes), legacy transactions, uncle
//! headers and withdrawals.

use alloy::primitives::{keccak256, Address, Bytes, U256};
use alloy_rlp::{Decodable, Header, EMPTY_STRING_CODE};

use crate::{
    block::{BlockHeader, Withdrawal},
    error::Error,
    raw::join,
    transaction::Transaction,
};

/// A legacy transaction as it appears in RLP: everything but the sender, which is recovered
/// from the signature rather than encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransaction {
    /// Sender nonce.
    pub nonce: u64,
    /// Gas price, in wei.
    pub gas_price: U256,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient, or `None` for contract creation.
    pub to: Option<Address>,
    /// Transferred value, in wei.
    pub value: U256,
    /// Call data.
    pub data: Bytes,
    /// Signature recovery id / parity.
    pub v: u64,
    /// Signature `r` component.
    pub r: U256,
    /// Signature `s` component.
    pub s: U256,
}

impl DecodedTransaction {
    /// Completes the transaction with its recovered sender.
    pub fn with_sender(self, sender: Address) -> Transaction {
        Transaction {
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: self.to,
            value: self.value,
            data: self.data,
            v: self.v,
            r: self.r,
            s: self.s,
            sender,
        }
    }
}

/// A block decoded from its RLP encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlock {
    /// The header. Its `hash` is the keccak256 of the encoded header.
    pub header: BlockHeader,
    /// Transactions, in block order.
    pub transactions: Vec<DecodedTransaction>,
    /// Uncle headers, in block order.
    pub uncle_headers: Vec<BlockHeader>,
    /// Withdrawals, in block order. Empty for pre-Shanghai blocks.
    pub withdrawals: Vec<Withdrawal>,
}

/// Decodes an RLP encoded block: `[header, transactions, uncles, withdrawals?]`.
///
/// Typed (EIP-2718) transaction envelopes are rejected rather than guessed at.
pub fn decode_block(rlp: &[u8]) -> Result<DecodedBlock, Error> {
    let mut buf = rlp;
    let mut block = take_list(&mut buf, "rlp")?;
    if !buf.is_empty() {
        return Err(Error::rlp("rlp", format!("{} trailing bytes after block", buf.len())));
    }

    let header = decode_header(&mut block, "rlp.header")?;

    let mut encoded = take_list(&mut block, "rlp.transactions")?;
    let mut transactions = Vec::new();
    while !encoded.is_empty() {
        let path = format!("rlp.transactions[{}]", transactions.len());
        transactions.push(decode_transaction(&mut encoded, &path)?);
    }

    let mut encoded = take_list(&mut block, "rlp.uncleHeaders")?;
    let mut uncle_headers = Vec::new();
    while !encoded.is_empty() {
        let path = format!("rlp.uncleHeaders[{}]", uncle_headers.len());
        uncle_headers.push(decode_header(&mut encoded, &path)?);
    }

    let mut withdrawals = Vec::new();
    if !block.is_empty() {
        let mut encoded = take_list(&mut block, "rlp.withdrawals")?;
        while !encoded.is_empty() {
            let path = format!("rlp.withdrawals[{}]", withdrawals.len());
            withdrawals.push(decode_withdrawal(&mut encoded, &path)?);
        }
    }

    if !block.is_empty() {
        return Err(Error::rlp("rlp", "unexpected trailing block items"));
    }

    Ok(DecodedBlock { header, transactions, uncle_headers, withdrawals })
}

/// Splits the payload of the next list item off `buf`.
fn take_list<'a>(buf: &mut &'a [u8], path: &str) -> Result<&'a [u8], Error> {
    let header = Header::decode(buf).map_err(|e| Error::rlp(path, e))?;
    if !header.list {
        return Err(Error::rlp(path, "expected a list"));
    }
    if buf.len() < header.payload_length {
        return Err(Error::rlp(path, "list payload overruns the input"));
    }

    let (payload, rest) = buf.split_at(header.payload_length);
    *buf = rest;
    Ok(payload)
}

fn field<T: Decodable>(buf: &mut &[u8], path: &str, name: &str) -> Result<T, Error> {
    T::decode(buf).map_err(|e| Error::rlp(&join(path, name), e))
}

/// Trailing header fields only exist from the fork that introduced them onwards.
fn optional<T: Decodable>(buf: &mut &[u8], path: &str, name: &str) -> Result<Option<T>, Error> {
    if buf.is_empty() {
        return Ok(None);
    }
    field(buf, path, name).map(Some)
}

fn decode_header(buf: &mut &[u8], path: &str) -> Result<BlockHeader, Error> {
    let start = *buf;
    let mut fields = take_list(buf, path)?;
    let hash = keccak256(&start[..start.len() - buf.len()]);

    // fields are evaluated in the order written, which is the encoding order
    let header = BlockHeader {
        parent_hash: field(&mut fields, path, "parentHash")?,
        uncle_hash: field(&mut fields, path, "uncleHash")?,
        coinbase: field(&mut fields, path, "coinbase")?,
        state_root: field(&mut fields, path, "stateRoot")?,
        transactions_trie: field(&mut fields, path, "transactionsTrie")?,
        receipt_trie: field(&mut fields, path, "receiptTrie")?,
        bloom: field(&mut fields, path, "bloom")?,
        difficulty: field(&mut fields, path, "difficulty")?,
        number: field(&mut fields, path, "number")?,
        gas_limit: field(&mut fields, path, "gasLimit")?,
        gas_used: field(&mut fields, path, "gasUsed")?,
        timestamp: field(&mut fields, path, "timestamp")?,
        extra_data: field(&mut fields, path, "extraData")?,
        mix_hash: field(&mut fields, path, "mixHash")?,
        nonce: field(&mut fields, path, "nonce")?,
        base_fee_per_gas: optional(&mut fields, path, "baseFeePerGas")?,
        withdrawals_root: optional(&mut fields, path, "withdrawalsRoot")?,
        blob_gas_used: optional(&mut fields, path, "blobGasUsed")?,
        excess_blob_gas: optional(&mut fields, path, "excessBlobGas")?,
        parent_beacon_block_root: optional(&mut fields, path, "parentBeaconBlockRoot")?,
        requests_hash: optional(&mut fields, path, "requestsHash")?,
        hash,
    };

    if !fields.is_empty() {
        return Err(Error::rlp(path, "unknown trailing header fields"));
    }
    Ok(header)
}

fn decode_transaction(buf: &mut &[u8], path: &str) -> Result<DecodedTransaction, Error> {
    match buf.first() {
        Some(&first) if first < alloy_rlp::EMPTY_LIST_CODE => {
            return Err(Error::rlp(path, "typed transaction envelopes are not supported"))
        }
        _ => {}
    }

    let mut fields = take_list(buf, path)?;
    let nonce = field(&mut fields, path, "nonce")?;
    let gas_price = field(&mut fields, path, "gasPrice")?;
    let gas_limit = field(&mut fields, path, "gasLimit")?;

    // contract creation encodes the recipient as the empty string
    let to = if fields.first() == Some(&EMPTY_STRING_CODE) {
        fields = &fields[1..];
        None
    } else {
        Some(field(&mut fields, path, "to")?)
    };

    let transaction = DecodedTransaction {
        nonce,
        gas_price,
        gas_limit,
        to,
        value: field(&mut fields, path, "value")?,
        data: field(&mut fields, path, "data")?,
        v: field(&mut fields, path, "v")?,
        r: field(&mut fields, path, "r")?,
        s: field(&mut fields, path, "s")?,
    };

    if !fields.is_empty() {
        return Err(Error::rlp(path, "unknown trailing transaction fields"));
    }
    Ok(transaction)
}

fn decode_withdrawal(buf: &mut &[u8], path: &str) -> Result<Withdrawal, Error> {
    let mut fields = take_list(buf, path)?;

    let withdrawal = Withdrawal {
        index: field(&mut fields, path, "index")?,
        validator_index: field(&mut fields, path, "validatorIndex")?,
        address: field(&mut fields, path, "address")?,
        amount: field(&mut fields, path, "amount")?,
    };

    if !fields.is_empty() {
        return Err(Error::rlp(path, "unknown trailing withdrawal fields"));
    }
    Ok(withdrawal)
}
