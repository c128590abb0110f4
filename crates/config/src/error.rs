//! Error types for the configuration module

use std::path::PathBuf;

/// Errors raised while loading, editing or saving the configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be read, written or deleted.
    #[error("failed to {action} config file '{}': {reason}", path.display())]
    File {
        /// What was being done to the file.
        action: &'static str,
        /// The configuration file.
        path: PathBuf,
        /// The underlying failure.
        reason: String,
    },

    /// The configuration file is not a valid configuration.
    #[error("invalid config file '{}': {reason}", path.display())]
    Syntax {
        /// The configuration file.
        path: PathBuf,
        /// The TOML decoder's complaint.
        reason: String,
    },

    /// A setting was given a value it cannot take.
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue {
        /// The setting.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A `MIMIR_*` environment override does not parse.
    #[error("{0}")]
    Environment(String),

    /// No setting has this name.
    #[error("'{0}' is not a configuration key")]
    UnknownKey(String),

    /// There is no home directory to keep the configuration file in.
    #[error("failed to locate the home directory; set {} instead", crate::CONFIG_PATH_ENV)]
    NoHomeDirectory,
}

impl Error {
    pub(crate) fn file(action: &'static str, path: &std::path::Path, reason: impl ToString) -> Self {
        Error::File { action, path: path.to_path_buf(), reason: reason.to_string() }
    }
}
