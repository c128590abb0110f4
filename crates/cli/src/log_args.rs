//! Logging flags shared by every subcommand.

use std::{io::IsTerminal, path::PathBuf};

use clap::{ArgAction, Args, ValueEnum};
use eyre::eyre;
use mimir_tracing::{
    tracing_subscriber::filter::Directive, FileInfo, FileWorkerGuard, LayerInfo, LogFormat,
    MimirTracer, Tracer,
};
use tracing::level_filters::LevelFilter;

/// Where and how much mimir logs.
#[derive(Debug, Args)]
#[clap(next_help_heading = "LOGGING")]
pub(crate) struct LogArgs {
    /// Log format on stdout.
    #[clap(long, value_name = "FORMAT", global = true, default_value_t = LogFormat::Terminal)]
    pub log_format: LogFormat,

    /// Extra filter directives, e.g. `mimir_vm=trace`. Apply to stdout and to the log file.
    #[clap(long, value_name = "DIRECTIVES", global = true, default_value = "")]
    pub log_filter: String,

    /// Also log to this file, at `debug` and above.
    #[clap(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log format in the log file.
    #[clap(long, value_name = "FORMAT", global = true, default_value_t = LogFormat::Json)]
    pub log_file_format: LogFormat,

    /// When to color stdout logs.
    #[clap(long, value_name = "WHEN", global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Raise the stdout log level: `-v` info, `-vv` debug, `-vvv` trace. Warnings and errors
    /// are always shown.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence stdout logs.
    #[clap(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// When to emit ANSI colors.
#[derive(Debug, Copy, Clone, ValueEnum, Eq, PartialEq)]
pub(crate) enum ColorMode {
    Always,
    Auto,
    Never,
}

impl LogArgs {
    /// The stdout log level.
    pub(crate) fn directive(&self) -> Directive {
        let level = match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::OFF,
            (_, 0) => LevelFilter::WARN,
            (_, 1) => LevelFilter::INFO,
            (_, 2) => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        level.into()
    }

    /// The color mode handed to the stdout layer; `None` turns colors off.
    fn color(&self) -> Option<String> {
        let enabled = match self.color {
            ColorMode::Always => true,
            ColorMode::Auto => std::io::stdout().is_terminal(),
            ColorMode::Never => false,
        };
        enabled.then(|| "always".to_string())
    }

    /// Where the file layer writes, split into directory and file name.
    fn file_info(&self) -> eyre::Result<Option<FileInfo>> {
        let Some(path) = &self.log_file else {
            return Ok(None);
        };
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| eyre!("--log-file '{}' does not name a file", path.display()))?;
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));

        Ok(Some(FileInfo::new(dir, name)))
    }

    /// Installs the global subscriber. Keep the returned guard alive until exit, or the tail
    /// of the log file is lost.
    pub(crate) fn init_tracing(&self) -> eyre::Result<Option<FileWorkerGuard>> {
        let stdout = LayerInfo::new(
            self.log_format,
            self.directive().to_string(),
            self.log_filter.clone(),
            self.color(),
        );
        let mut tracer = MimirTracer::new().with_stdout(stdout);

        if let Some(file_info) = self.file_info()? {
            let filter = format!("debug,{}", self.log_filter);
            let file = LayerInfo::new(self.log_file_format, String::new(), filter, None);
            tracer = tracer.with_file(file, file_info);
        }

        tracer.init()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        logs: LogArgs,
    }

    fn level(args: &[&str]) -> String {
        let cli = Cli::parse_from(std::iter::once("mimir").chain(args.iter().copied()));
        cli.logs.directive().to_string().to_lowercase()
    }

    #[test]
    fn test_verbosity_directive() {
        assert_eq!(level(&[]), "warn");
        assert_eq!(level(&["-v"]), "info");
        assert_eq!(level(&["-vv"]), "debug");
        assert_eq!(level(&["-vvvvv"]), "trace");
        assert_eq!(level(&["-q"]), "off");
        assert!(Cli::try_parse_from(["mimir", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_log_file_flags() {
        let cli = Cli::parse_from([
            "mimir",
            "--log-file",
            "/tmp/mimir/run.log",
            "--log-file-format",
            "log-fmt",
            "--color",
            "never",
        ]);
        assert_eq!(cli.logs.log_file_format, LogFormat::LogFmt);
        assert_eq!(cli.logs.color(), None);

        let file_info = cli.logs.file_info().expect("names a file").expect("file is set");
        assert_eq!(file_info.path(), PathBuf::from("/tmp/mimir/run.log"));
    }

    #[test]
    fn test_log_file_must_name_a_file() {
        let cli = Cli::parse_from(["mimir", "--log-file", "/"]);
        assert!(cli.logs.file_info().is_err());

        let cli = Cli::parse_from(["mimir"]);
        assert!(cli.logs.file_info().expect("no file").is_none());
    }
}
