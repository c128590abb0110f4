use alloy::primitives::Address;
use serde::Deserialize;
use serde_json::Value;

use crate::{error::Error, hex::parse_address};

/// The untyped result of a VM invocation, and the shape of fixture files: a nested mapping of
/// hex strings, integers, limb pairs and further mappings.
pub type RawResult = Value;

/// Appends `name` to a dotted field path.
pub(crate) fn join(path: &str, name: &str) -> String {
    match (path.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (_, true) => path.to_string(),
        _ if name.starts_with('[') => format!("{path}{name}"),
        _ => format!("{path}.{name}"),
    }
}

/// Deserializes a model value from a raw mapping. Failures name the dotted path of the
/// offending field.
pub fn from_raw<'a, T: Deserialize<'a>>(raw: &'a RawResult) -> Result<T, Error> {
    from_raw_at(raw, "")
}

/// Like [`from_raw`], for a mapping found at `path` inside a larger one.
pub fn from_raw_at<'a, T: Deserialize<'a>>(raw: &'a RawResult, path: &str) -> Result<T, Error> {
    serde_path_to_error::deserialize(raw).map_err(|e| Error::deserialize(path, e))
}

/// Parses a mapping key holding a 20-byte address.
pub fn parse_address_key(key: &str, path: &str) -> Result<Address, Error> {
    parse_address::<serde_json::Error>(key).map_err(|e| Error::classify(path, e.to_string()))
}
