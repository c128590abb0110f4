//! Error types for the numeric codec

/// Errors raised while decoding hex strings into bytes or 256-bit integers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input is not valid hexadecimal, or does not fit the requested width.
    #[error("malformed hex '{input}': {reason}")]
    MalformedHex {
        /// The offending input, as given.
        input: String,
        /// Why the input was rejected.
        reason: String,
    },
}

impl Error {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Error::MalformedHex { input: input.to_string(), reason: reason.into() }
    }
}
