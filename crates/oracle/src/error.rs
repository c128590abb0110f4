//! Error types for the equivalence oracle

use std::fmt;

/// The first field, depth-first, at which two values disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Dotted path of the field, using fixture field names.
    pub field: String,
    /// The reference value, rendered.
    pub expected: String,
    /// The value under test, rendered.
    pub actual: String,
}

impl Mismatch {
    /// Creates a new mismatch.
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self { field: field.into(), expected: expected.into(), actual: actual.into() }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Errors raised by the oracle
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The two sides diverge.
    #[error("equivalence mismatch at {0}")]
    EquivalenceMismatch(Mismatch),

    /// The value under test could not be read back into the model.
    #[error(transparent)]
    Model(#[from] mimir_model::Error),
}

impl From<Mismatch> for Error {
    fn from(mismatch: Mismatch) -> Self {
        Error::EquivalenceMismatch(mismatch)
    }
}
