//! The invocation boundary to the constrained-arithmetic EVM under test.
//!
//! The VM is an opaque collaborator: [`Invoker::invoke`] runs one named program on keyword
//! inputs and returns its raw result. This crate provides the boundary itself, a timeout
//! wrapper, a runner for an external VM process, and an in-process loopback VM that
//! answers every program the way the real VM does.

/// Program identifiers, inputs, the invocation boundary and its timeout wrapper
pub mod core;

/// Error types for the VM boundary
pub mod error;

/// VM backends: an external process and the in-process loopback
pub mod ext;

pub use crate::core::{
    inputs::{Input, Inputs},
    invoker::{execution_failure, Invoker},
    program::Program,
    timeout::TimedInvoker,
};
pub use error::Error;
pub use ext::{loopback::LoopbackVm, process::ProcessVm, Backend};
