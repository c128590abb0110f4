use std::time::Duration;

use clap::Parser;

use super::config::{Curve, EcMulConfig};

#[derive(Debug, Clone, Default, Parser)]
#[clap(
    about = "Differentially tests the VM's EC multiplication against a reference",
    override_usage = "mimir ec-mul [OPTIONS]"
)]
/// Arguments for the ec-mul operation
///
/// Unset options fall back to the configured defaults.
pub struct EcMulArgs {
    /// Number of randomized trials to run, on top of the fixed edge cases.
    #[clap(long, short)]
    pub trials: Option<usize>,

    /// Base seed for the randomized trials.
    #[clap(long, short)]
    pub seed: Option<u64>,

    /// Replay the single randomized trial with this seed, instead of a full run.
    #[clap(long, conflicts_with_all = ["trials", "seed"])]
    pub replay: Option<u64>,

    /// Number of worker threads.
    #[clap(long = "threads", short = 'j')]
    pub threads: Option<usize>,

    /// Time limit per VM invocation, in milliseconds.
    #[clap(long = "timeout")]
    pub timeout_ms: Option<u64>,

    /// The curve under test.
    #[clap(long, value_enum)]
    pub curve: Option<Curve>,
}

impl EcMulArgs {
    /// Overlays the options given on the command line onto `defaults`.
    pub fn apply(&self, defaults: EcMulConfig) -> EcMulConfig {
        EcMulConfig {
            trials: self.trials.unwrap_or(defaults.trials),
            seed: self.seed.or(defaults.seed),
            timeout: self.timeout_ms.map(Duration::from_millis).unwrap_or(defaults.timeout),
            curve: self.curve.unwrap_or(defaults.curve),
            threads: self.threads.unwrap_or(defaults.threads),
        }
    }
}
