//! Error types for the canonical model

use serde_path_to_error::{Path, Segment};

use crate::{hex::MALFORMED_HEX, raw::join};

/// Errors raised while building canonical model values from raw fixture data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A hex field could not be decoded at all.
    #[error("malformed hex at '{path}': {reason}")]
    MalformedHex {
        /// Dotted path of the offending field.
        path: String,
        /// The codec's complaint.
        reason: String,
    },

    /// The input does not match the expected shape or width.
    #[error("schema violation at '{path}': {reason}")]
    SchemaViolation {
        /// Dotted path of the offending field.
        path: String,
        /// What was expected, and what was found instead.
        reason: String,
    },

    /// An RLP payload could not be decoded into the model.
    #[error("invalid rlp at '{path}': {reason}")]
    InvalidRlp {
        /// Position inside the decoded structure.
        path: String,
        /// The decoder's complaint.
        reason: String,
    },
}

fn render(path: &Path) -> String {
    path.iter().fold(String::new(), |rendered, segment| match segment {
        Segment::Seq { index } => format!("{rendered}[{index}]"),
        Segment::Map { key } | Segment::Enum { variant: key } => join(&rendered, key),
        _ => join(&rendered, "?"),
    })
}

impl Error {
    pub(crate) fn rlp(path: &str, reason: impl std::fmt::Display) -> Self {
        Error::InvalidRlp { path: path.to_string(), reason: reason.to_string() }
    }

    /// Sorts a deserializer message into a model error at `path`. A missing field is reported
    /// at the field itself rather than at its parent.
    pub(crate) fn classify(path: &str, message: String) -> Self {
        if let Some(reason) = message.strip_prefix(MALFORMED_HEX) {
            return Error::MalformedHex { path: path.to_string(), reason: reason.to_string() };
        }

        match message.strip_prefix("missing field `").and_then(|rest| rest.strip_suffix('`')) {
            Some(field) => Error::SchemaViolation {
                path: join(path, field),
                reason: "missing required field".to_string(),
            },
            None => Error::SchemaViolation { path: path.to_string(), reason: message },
        }
    }

    pub(crate) fn deserialize(
        prefix: &str,
        error: serde_path_to_error::Error<serde_json::Error>,
    ) -> Self {
        let path = join(prefix, &render(error.path()));
        Self::classify(&path, error.into_inner().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            Error::classify("transactions[1]", "missing field `gasPrice`".to_string()).to_string(),
            "schema violation at 'transactions[1].gasPrice': missing required field"
        );
        assert!(matches!(
            Error::classify("code", format!("{MALFORMED_HEX}malformed hex '0xzz': bad digit")),
            Error::MalformedHex { ref path, .. } if path == "code"
        ));
        assert_eq!(
            Error::classify("", "invalid type: null, expected a hex string".to_string())
                .to_string(),
            "schema violation at '': invalid type: null, expected a hex string"
        );
    }
}
