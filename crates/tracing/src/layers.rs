use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Directive, EnvFilter, Layer, Registry};

use crate::formatter::LogFormat;

/// A worker guard returned by the file layer.
///
/// When a guard is dropped, all events currently in-memory are flushed to the log file this
/// guard belongs to.
pub type FileWorkerGuard = WorkerGuard;

/// A boxed tracing [Layer].
pub(crate) type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Manages the collection of layers for a tracing subscriber.
///
/// `Layers` acts as a container for different logging layers such as stdout and file, each
/// configured with its own format and filter.
#[derive(Default)]
pub(crate) struct Layers {
    inner: Vec<BoxedLayer<Registry>>,
}

impl std::fmt::Debug for Layers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layers").field("layers", &self.inner.len()).finish()
    }
}

impl Layers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_inner(self) -> Vec<BoxedLayer<Registry>> {
        self.inner
    }

    /// Adds a stdout layer.
    pub(crate) fn stdout(
        &mut self,
        format: LogFormat,
        default_directive: Directive,
        filters: &str,
        color: Option<String>,
    ) -> eyre::Result<()> {
        let filter = build_env_filter(Some(default_directive), filters)?;
        self.inner.push(format.apply(filter, color, None));
        Ok(())
    }

    /// Adds a file layer, writing through a non-blocking worker.
    pub(crate) fn file(
        &mut self,
        format: LogFormat,
        filter: &str,
        file_info: FileInfo,
    ) -> eyre::Result<FileWorkerGuard> {
        std::fs::create_dir_all(&file_info.dir)?;
        let appender = tracing_appender::rolling::never(&file_info.dir, &file_info.file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let filter = build_env_filter(None, filter)?;
        self.inner.push(format.apply(filter, None, Some(writer)));
        Ok(guard)
    }
}

/// Where the file layer writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    dir: PathBuf,
    file_name: String,
}

impl FileInfo {
    /// Creates a new file info, writing `file_name` inside `dir`.
    pub fn new(dir: impl AsRef<Path>, file_name: impl Into<String>) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), file_name: file_name.into() }
    }

    /// The full path of the log file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Builds an environment filter from `RUST_LOG`, the default directive and comma separated
/// extra directives.
fn build_env_filter(
    default_directive: Option<Directive>,
    directives: &str,
) -> eyre::Result<EnvFilter> {
    let env_filter = if let Some(default_directive) = default_directive {
        EnvFilter::builder().with_default_directive(default_directive).from_env_lossy()
    } else {
        EnvFilter::builder().from_env_lossy()
    };

    directives
        .split(',')
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .try_fold(env_filter, |env_filter, directive| {
            Ok(env_filter.add_directive(directive.parse()?))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_env_filter() {
        assert!(build_env_filter(None, "").is_ok());
        assert!(build_env_filter(Some("info".parse().expect("directive")), "mimir_vm=trace").is_ok());
        assert!(build_env_filter(None, "mimir_vm=[").is_err());
    }

    #[test]
    fn test_file_layer_writes_every_format() {
        use tracing_subscriber::layer::SubscriberExt;

        let dir = std::env::temp_dir().join(format!("mimir-file-layer-{}", std::process::id()));
        for format in [LogFormat::LogFmt, LogFormat::Json, LogFormat::Terminal] {
            let file_info = FileInfo::new(&dir, format!("{format}.log"));
            let mut layers = Layers::new();
            let guard = layers.file(format, "info", file_info.clone()).expect("file layer");

            let subscriber = tracing_subscriber::registry().with(layers.into_inner());
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!(trial = 3, "written to file");
            });
            drop(guard);

            let logged = std::fs::read_to_string(file_info.path()).expect("log file is written");
            assert!(logged.contains("written to file"), "{format}: {logged}");
            assert!(logged.contains('3'), "{format}: {logged}");
            if format == LogFormat::LogFmt {
                assert!(logged.contains("level=info"), "{logged}");
                assert!(logged.contains("trial=3"), "{logged}");
            }
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_info_path() {
        let info = FileInfo::new("/tmp/mimir-logs", "mimir.log");
        assert_eq!(info.path(), PathBuf::from("/tmp/mimir-logs/mimir.log"));
    }
}
