use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use mimir_config::ConfigArgs;
use mimir_core::mimir_precompile::EcMulArgs;

use crate::log_args::LogArgs;

#[derive(Debug, Parser)]
#[clap(name = "mimir", version)]
pub(crate) struct Arguments {
    #[clap(subcommand)]
    pub sub: Subcommands,

    /// The command that runs a program on the VM under test. Overrides the configured
    /// command; the loopback VM is used if neither is set.
    #[clap(long = "vm", value_name = "COMMAND", global = true)]
    pub vm_command: Option<String>,

    #[clap(flatten)]
    pub logs: LogArgs,
}

#[derive(Debug, Subcommand)]
#[clap(
    about = "mimir checks a constrained-arithmetic EVM against canonical Ethereum semantics",
    after_help = "Without a configured VM command, every command runs against the in-process loopback VM."
)]
pub(crate) enum Subcommands {
    #[clap(name = "run", about = "Run test scenarios from fixture files")]
    Run(RunArgs),

    #[clap(name = "ec-mul", about = "Differentially test the VM's EC multiplication")]
    EcMul(EcMulArgs),

    #[clap(name = "config", about = "Display and edit the current configuration")]
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Debug, Clone, Args)]
pub(crate) struct RunArgs {
    /// Fixture files to run. The built-in scenarios run if none are given.
    #[clap(value_name = "FIXTURE")]
    pub fixtures: Vec<PathBuf>,

    /// Time limit per VM invocation, in milliseconds.
    #[clap(long = "timeout")]
    pub timeout_ms: Option<u64>,

    /// Stop at the first failing scenario.
    #[clap(long)]
    pub fail_fast: bool,
}
