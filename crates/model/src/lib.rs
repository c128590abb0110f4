//! The canonical data model for Ethereum primitives: blocks, transactions, accounts and
//! global state.
//!
//! Values are deserialized with `serde` from the nested hex mappings found in fixture files
//! (and returned by the VM under test), with width and presence checks on every field. Every
//! failure names the dotted path of the offending field. Parsing is pure: no I/O, and no
//! cross-field validation beyond widths and types.

/// Error types for the model.
pub mod error;

/// Accounts and contract storage.
pub mod account;
/// Blocks, block headers and withdrawals.
pub mod block;
/// Rendering model values back into raw mappings.
pub mod encode;
/// Reference fixtures.
pub mod fixtures;
/// Serde helpers for hex-encoded fields.
pub mod hex;
/// Deserializing model values out of raw, untyped mappings.
pub mod raw;
/// Decoding of block RLP.
pub mod rlp;
/// Global state snapshots.
pub mod state;
/// Legacy transactions.
pub mod transaction;

pub use account::{parse_account, Account, Storage};
pub use block::{parse_block, Block, BlockHeader, Withdrawal};
pub use encode::{Encode, Encoding};
pub use error::Error;
pub use raw::{from_raw, from_raw_at, RawResult};
pub use state::{parse_state, State};
pub use transaction::Transaction;
