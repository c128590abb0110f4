//! The scenario runner ties the harness together: it turns fixtures into canonical model
//! values, invokes the VM under test on them, parses what comes back and asks the
//! equivalence oracle whether the two agree.
//!
//! The crates it builds on are re-exported, so this crate is the single entry point for
//! embedding the harness.

/// Error types for the scenario runner
pub mod error;
/// Test scenarios and their file format
pub mod fixture;
/// Runs scenarios against a VM
pub mod harness;

// Re-export all harness crates
pub use mimir_model;
pub use mimir_model::fixtures;
pub use mimir_oracle;
pub use mimir_precompile;
pub use mimir_vm;

pub use error::Error;
pub use fixture::Fixture;
pub use harness::{ec_mul_config, Harness};
