//! Common utilities used across the mimir workspace.
//!
//! This crate provides the numeric codec every other crate builds on (hex strings, byte
//! strings, 256-bit integers and their limb pair decomposition), together with small general
//! purpose utilities.

/// Hex, 256-bit integer and limb pair conversions.
pub mod codec;

/// Error types for the numeric codec.
pub mod error;

/// General utility functions and types for common tasks.
pub mod utils;

pub use error::Error;
