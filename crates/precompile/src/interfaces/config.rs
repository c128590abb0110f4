use std::{fmt, str::FromStr, time::Duration};

use clap::ValueEnum;
use derive_builder::Builder;

/// The curve whose scalar multiplication is tested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Curve {
    /// alt_bn128 (BN254 G1), as used by the `0x07` precompile (EIP-196).
    #[default]
    #[value(name = "alt_bn128", alias = "bn254")]
    AltBn128,
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::AltBn128 => f.write_str("alt_bn128"),
        }
    }
}

impl FromStr for Curve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "alt_bn128" | "bn254" => Ok(Curve::AltBn128),
            _ => Err(format!("unsupported curve '{s}'")),
        }
    }
}

/// Parameters of one differential EC multiplication run. Passed explicitly; the tester reads
/// no ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct EcMulConfig {
    /// Number of randomized trials, on top of the fixed edge cases.
    pub trials: usize,

    /// Base seed for the randomized trials. Drawn at random when the run starts if unset,
    /// and always reported so a failing run can be replayed.
    pub seed: Option<u64>,

    /// Time limit per VM invocation.
    pub timeout: Duration,

    /// The curve under test.
    pub curve: Curve,

    /// Number of worker threads running trials.
    pub threads: usize,
}

impl EcMulConfigBuilder {
    /// Creates a new EcMulConfigBuilder with default values
    pub fn new() -> Self {
        Self {
            trials: Some(20),
            seed: Some(None),
            timeout: Some(Duration::from_secs(60)),
            curve: Some(Curve::AltBn128),
            threads: Some(1),
        }
    }
}

impl Default for EcMulConfig {
    fn default() -> Self {
        EcMulConfig {
            trials: 20,
            seed: None,
            timeout: Duration::from_secs(60),
            curve: Curve::AltBn128,
            threads: 1,
        }
    }
}
