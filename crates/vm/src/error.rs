//! Error types for the VM boundary

use std::time::Duration;

use crate::core::program::Program;

/// Errors raised while invoking the VM under test. Neither is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The VM rejected its inputs, crashed, or returned something unreadable.
    #[error("execution of '{program}' failed (inputs: {inputs}): {reason}")]
    ExecutionFailure {
        /// The program that was invoked.
        program: Program,
        /// The keywords the program was invoked with.
        inputs: String,
        /// What went wrong.
        reason: String,
    },

    /// The VM did not return within its time limit.
    #[error("execution of '{program}' timed out after {timeout:?}")]
    ExecutionTimeout {
        /// The program that was invoked.
        program: Program,
        /// The time limit that was exceeded.
        timeout: Duration,
    },
}
