//! The `mimir-tracing` crate provides a tracing subscriber setup for the mimir binary and its
//! tests: a stdout layer in one of several formats, and an optional non-blocking file layer.
//!
//! ```no_run
//! use mimir_tracing::{LayerInfo, LogFormat, MimirTracer, Tracer};
//!
//! let stdout = LayerInfo::new(LogFormat::Terminal, "info".to_string(), String::new(), None);
//! let _guard = MimirTracer::new().with_stdout(stdout).init().expect("tracing initializes");
//! ```

// Re-export tracing crates
pub use tracing;
pub use tracing_subscriber;

// Re-export our types
pub use formatter::LogFormat;
pub use layers::{FileInfo, FileWorkerGuard};

mod formatter;
mod layers;

use crate::layers::Layers;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracer for application logging.
///
/// Manages the configuration and initialization of logging layers, including standard output
/// and an optional file.
#[derive(Debug, Clone)]
pub struct MimirTracer {
    stdout: LayerInfo,
    file: Option<(LayerInfo, FileInfo)>,
}

impl MimirTracer {
    /// Constructs a new `MimirTracer` with default settings: terminal output at the `INFO`
    /// level, and no file logging.
    pub fn new() -> Self {
        Self { stdout: LayerInfo::default(), file: None }
    }

    /// Sets the stdout layer configuration.
    pub fn with_stdout(mut self, config: LayerInfo) -> Self {
        self.stdout = config;
        self
    }

    /// Sets the file layer configuration and where it writes.
    pub fn with_file(mut self, config: LayerInfo, file_info: FileInfo) -> Self {
        self.file = Some((config, file_info));
        self
    }
}

impl Default for MimirTracer {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for a logging layer: its format, default verbosity, extra filter directives
/// and color mode.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    /// Constructs a new `LayerInfo`.
    ///
    /// * `format` - The log message format.
    /// * `default_directive` - The directive applied when `RUST_LOG` sets none, e.g. `info`.
    /// * `filters` - Comma separated additional filter directives.
    /// * `color` - The color mode, or `None` for no ANSI escape codes.
    pub fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }
}

impl Default for LayerInfo {
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: LevelFilter::INFO.to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// Initializes a global tracing subscriber.
pub trait Tracer {
    /// Installs the subscriber. Returns the file layer's worker guard, if a file layer was
    /// configured; logs are flushed when it is dropped.
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>>;
}

impl Tracer for MimirTracer {
    fn init(self) -> eyre::Result<Option<FileWorkerGuard>> {
        let mut layers = Layers::new();

        layers.stdout(
            self.stdout.format,
            self.stdout.default_directive.parse()?,
            &self.stdout.filters,
            self.stdout.color,
        )?;

        let file_guard = if let Some((config, file_info)) = self.file {
            Some(layers.file(config.format, &config.filters, file_info)?)
        } else {
            None
        };

        // a subscriber may already be installed, e.g. by a test harness
        let _ = tracing_subscriber::registry().with(layers.into_inner()).try_init();
        Ok(file_guard)
    }
}

/// Installs a subscriber for tests: `RUST_LOG` filtered, written through the test writer so
/// output is captured per test. Safe to call more than once.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
