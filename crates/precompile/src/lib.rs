//! Differential testing of the VM's precompiles.
//!
//! The VM's EC multiplication (`test__ecmul_impl`, the `0x07` precompile) is run on a fixed
//! set of edge cases and on seeded random inputs, and every product is checked against an
//! independent reference implementation. Each random trial has its own seed, so a failure
//! can be replayed alone.

/// Sampling, the reference implementation and the tester itself
pub mod core;
/// Error types for the tester
pub mod error;
/// Configuration and command line arguments
pub mod interfaces;

pub use crate::core::{
    ec_mul,
    point::EcPoint,
    report::{EcMulReport, TrialRecord},
    sample::{Case, Trial},
    DifferentialTester,
};
pub use error::Error;
pub use interfaces::{Curve, EcMulArgs, EcMulConfig, EcMulConfigBuilder};
