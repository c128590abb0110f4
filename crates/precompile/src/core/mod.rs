/// Curve points
pub mod point;
pub mod reference;
/// Run reports
pub mod report;
pub mod sample;

use std::time::Instant;

use mimir_common::utils::threading::{task_pool, TaskOutcome};
use mimir_model::{from_raw, hex::Word};
use mimir_vm::{Inputs, Invoker, Program, TimedInvoker};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{error::Error, interfaces::EcMulConfig};
use point::EcPoint;
use report::{EcMulReport, TrialRecord};
use sample::Trial;

/// Runs EC multiplication trials against the VM and checks every product against the
/// reference implementation.
#[derive(Debug)]
pub struct DifferentialTester<I> {
    invoker: TimedInvoker<I>,
    config: EcMulConfig,
}

/// The VM's answer to an EC multiplication.
#[derive(Debug, Deserialize)]
struct Product {
    x: Word,
    y: Word,
}

impl From<Product> for EcPoint {
    fn from(Product { x: Word(x), y: Word(y) }: Product) -> Self {
        EcPoint::new(x, y)
    }
}

/// Ties `source` to the trial it happened on, so the run can be replayed.
fn trial_failed(trial: &Trial, source: Error) -> Error {
    warn!(trial = trial.index, seed = trial.seed, case = %trial.case, %source, "trial failed");
    Error::TrialFailed {
        seed: trial.seed,
        trial: trial.index,
        scalar: trial.scalar,
        point: trial.point,
        source: Box::new(source),
    }
}

impl<I> DifferentialTester<I>
where
    I: Invoker + Send + Sync + 'static,
{
    /// Creates a tester driving `invoker`, with each invocation limited to `config.timeout`.
    pub fn new(invoker: I, config: EcMulConfig) -> Self {
        Self { invoker: TimedInvoker::new(invoker, config.timeout), config }
    }

    /// The configuration this tester runs with.
    pub fn config(&self) -> &EcMulConfig {
        &self.config
    }

    /// Runs one trial: computes the reference product, invokes the VM, and compares.
    pub fn run_trial(&self, trial: &Trial) -> Result<(), Error> {
        let expected = reference::ec_mul(self.config.curve, trial.point, trial.scalar)
            .ok_or(Error::InvalidPoint { trial: trial.index, point: trial.point })?;

        let inputs = Inputs::new()
            .with("x", trial.point.x)
            .with("y", trial.point.y)
            .with("scalar", trial.scalar);
        let raw = self
            .invoker
            .invoke(Program::EcMul, &inputs)
            .map_err(|e| trial_failed(trial, e.into()))?;
        let actual: EcPoint = from_raw::<Product>(&raw)
            .map_err(|e| trial_failed(trial, e.into()))?
            .into();

        if actual != expected {
            warn!(
                trial = trial.index,
                seed = trial.seed,
                case = %trial.case,
                %expected,
                %actual,
                "ec_mul mismatch"
            );
            return Err(Error::PrecompileMismatch {
                seed: trial.seed,
                trial: trial.index,
                scalar: trial.scalar,
                point: trial.point,
                expected,
                actual,
            });
        }

        debug!(trial = trial.index, case = %trial.case, "ec_mul agrees with reference");
        Ok(())
    }

    /// Runs the edge cases and the random trials, collecting a verdict for every one of them.
    /// A trial that panics or times out does not stop the others.
    pub fn run(&self) -> EcMulReport {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let plan = sample::plan(self.config.curve, self.config.trials, seed);
        let planned = plan.len();
        let start_time = Instant::now();

        info!(
            precompile = ?Program::EcMul.precompile_address(),
            curve = %self.config.curve,
            seed,
            planned,
            threads = self.config.threads,
            "starting differential run"
        );

        let outcomes =
            task_pool(plan.clone(), self.config.threads, |trial| self.run_trial(&trial));
        let records: Vec<TrialRecord> = plan
            .into_iter()
            .zip(outcomes)
            .map(|(trial, outcome)| {
                let outcome = match outcome {
                    TaskOutcome::Completed(outcome) => outcome,
                    TaskOutcome::Panicked(message) => Err(Error::TrialPanicked {
                        seed: trial.seed,
                        trial: trial.index,
                        message,
                    }),
                };
                TrialRecord { trial, outcome }
            })
            .collect();

        let report = EcMulReport { seed, planned, records };
        info!(
            seed,
            planned,
            executed = report.executed(),
            passed = report.passed(),
            elapsed = ?start_time.elapsed(),
            "differential run finished"
        );
        report
    }

    /// Replays the single random trial drawn from `seed`.
    pub fn replay(&self, seed: u64) -> Result<Trial, Error> {
        let trial = sample::random_trial(self.config.curve, 0, seed);
        info!(seed, scalar = %format!("{:#x}", trial.scalar), point = %trial.point, "replaying");

        self.run_trial(&trial).map(|_| trial)
    }
}

/// Runs a full differential EC multiplication test against `invoker`. Fails with the first
/// failing trial's error, or if any planned trial did not execute.
pub fn ec_mul<I>(invoker: I, config: EcMulConfig) -> Result<EcMulReport, Error>
where
    I: Invoker + Send + Sync + 'static,
{
    DifferentialTester::new(invoker, config).run().into_result()
}
