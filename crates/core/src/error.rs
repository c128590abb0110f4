//! Error types for the scenario runner

use std::path::PathBuf;

/// Error type for the scenario runner
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A fixture file could not be read or is not valid JSON
    #[error("failed to load fixture '{}': {reason}", path.display())]
    Fixture {
        /// The fixture file.
        path: PathBuf,
        /// Why it could not be loaded.
        reason: String,
    },
    /// A fixture or VM result does not match the data model
    #[error(transparent)]
    Model(#[from] mimir_model::Error),
    /// The oracle found a difference
    #[error(transparent)]
    Oracle(#[from] mimir_oracle::Error),
    /// The VM failed or timed out
    #[error(transparent)]
    Vm(#[from] mimir_vm::Error),
    /// The differential precompile test failed
    #[error(transparent)]
    Precompile(#[from] mimir_precompile::Error),
    /// The configuration is invalid
    #[error(transparent)]
    Config(#[from] mimir_config::error::Error),
}
