//! Error types for the differential precompile tester

use alloy::primitives::U256;

use crate::core::point::EcPoint;

/// Errors raised by the differential tester
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The VM and the reference disagree on a product.
    #[error(
        "ec_mul mismatch on trial {trial} (seed {seed}): {scalar:#x} * {point} = {expected}, \
         vm returned {actual}"
    )]
    PrecompileMismatch {
        /// Base seed of the run, or the trial's own seed for random trials.
        seed: u64,
        /// Position of the trial in the run.
        trial: usize,
        /// The scalar.
        scalar: U256,
        /// The multiplied point.
        point: EcPoint,
        /// The reference product.
        expected: EcPoint,
        /// The VM's product.
        actual: EcPoint,
    },

    /// The reference rejected a planned input.
    #[error("reference rejected trial {trial}: {point} is not on the curve")]
    InvalidPoint {
        /// Position of the trial in the run.
        trial: usize,
        /// The rejected point.
        point: EcPoint,
    },

    /// The VM failed on a trial, or its result could not be read.
    #[error("trial {trial} (seed {seed}) failed on {scalar:#x} * {point}: {source}")]
    TrialFailed {
        /// Base seed of the run, or the trial's own seed for random trials.
        seed: u64,
        /// Position of the trial in the run.
        trial: usize,
        /// The scalar.
        scalar: U256,
        /// The multiplied point.
        point: EcPoint,
        /// What went wrong.
        #[source]
        source: Box<Error>,
    },

    /// A trial panicked before reaching a verdict.
    #[error("trial {trial} (seed {seed}) panicked: {message}")]
    TrialPanicked {
        /// Base seed of the run, or the trial's own seed for random trials.
        seed: u64,
        /// Position of the trial in the run.
        trial: usize,
        /// The panic message.
        message: String,
    },

    /// Fewer trials reached a verdict than were planned.
    #[error("only {executed} of {planned} planned trials were executed")]
    Incomplete {
        /// Trials that reached a verdict.
        executed: usize,
        /// Trials planned.
        planned: usize,
    },

    /// The VM failed or timed out.
    #[error(transparent)]
    Vm(#[from] mimir_vm::Error),

    /// The VM's result could not be read.
    #[error(transparent)]
    Model(#[from] mimir_model::Error),
}

impl Error {
    /// The seed that reproduces the failing trial, if this error belongs to one.
    pub fn seed(&self) -> Option<u64> {
        match self {
            Error::PrecompileMismatch { seed, .. }
            | Error::TrialFailed { seed, .. }
            | Error::TrialPanicked { seed, .. } => Some(*seed),
            _ => None,
        }
    }
}
