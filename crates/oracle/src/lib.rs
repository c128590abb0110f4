//! The equivalence oracle decides whether two canonical model values (or a model value and a
//! raw VM result) are the same, and reports the first field at which they are not.

/// Consistency checks between a block's fields and its RLP encoding.
pub mod consistency;
/// Error types for the oracle.
pub mod error;
/// Structural equality over the canonical model.
pub mod equivalence;
/// Round-trip checks of accounts and states through the VM.
pub mod round_trip;

pub use consistency::{verify_block_rlp, verify_header_hash};
pub use equivalence::{assert_equivalent, diff, equal, equal_exact, Equivalent, StorageMode};
pub use error::{Error, Mismatch};
pub use round_trip::{verify_account_round_trip, verify_state_round_trip};
