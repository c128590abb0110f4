use std::time::{Duration, Instant};

use mimir_config::Configuration;
use mimir_model::{parse_block, Account, Block, RawResult, State};
use mimir_oracle::{
    assert_equivalent, verify_account_round_trip, verify_state_round_trip, StorageMode,
};
use mimir_precompile::{
    Curve, DifferentialTester, EcMulConfig, EcMulConfigBuilder, EcMulReport, Trial,
};
use mimir_vm::{Backend, Inputs, Invoker, Program, TimedInvoker};
use tracing::{debug, info};

use crate::{error::Error, fixture::Fixture};

/// Runs test scenarios against a VM: builds the inputs, invokes the program, parses the result
/// and hands it to the oracle. Every invocation is limited by the harness timeout.
#[derive(Debug)]
pub struct Harness<I> {
    invoker: TimedInvoker<I>,
}

impl Harness<Backend> {
    /// Creates a harness for the configured VM: the external runner if `vm_command` is set,
    /// and the loopback VM otherwise.
    pub fn from_configuration(configuration: &Configuration) -> Self {
        let timeout = configuration.timeout();
        let command = Some(configuration.vm_command.as_str());
        let backend = match Backend::from_command(command, &configuration.vm_args) {
            Backend::Process(vm) => Backend::Process(vm.with_timeout(timeout)),
            loopback => loopback,
        };

        debug!(backend = backend.name(), ?timeout, "selected vm backend");
        Self::new(backend, timeout)
    }
}

impl<I> Harness<I>
where
    I: Invoker + Send + Sync + 'static,
{
    /// Creates a harness driving `invoker`.
    pub fn new(invoker: I, timeout: Duration) -> Self {
        Self { invoker: TimedInvoker::new(invoker, timeout) }
    }

    /// The time limit per invocation.
    pub fn timeout(&self) -> Duration {
        self.invoker.timeout()
    }

    /// The VM this harness drives.
    pub fn invoker(&self) -> &I {
        self.invoker.inner()
    }

    fn invoke(&self, program: Program, inputs: Inputs) -> Result<RawResult, Error> {
        let start_time = Instant::now();
        let result = self.invoker.invoke(program, &inputs)?;
        debug!(%program, elapsed = ?start_time.elapsed(), "invocation succeeded");
        Ok(result)
    }

    /// Executes `block` on the pre-state `state`. Succeeds if the VM does; the raw result is
    /// returned to the caller.
    pub fn run_os(&self, block: &Block, state: &State) -> Result<RawResult, Error> {
        self.invoke(
            Program::Os,
            Inputs::new().with("block", block.clone()).with("state", state.clone()),
        )
    }

    /// Sends `block` through the VM and checks it comes back equivalent.
    pub fn block_round_trip(&self, block: &Block) -> Result<(), Error> {
        let raw = self.invoke(Program::Block, Inputs::new().with("block", block.clone()))?;
        let actual = parse_block(&raw)?;

        Ok(assert_equivalent(block, &actual, StorageMode::Exact)?)
    }

    /// Sends `account` through the VM and checks it comes back equivalent. The VM hashes
    /// storage keys, so storage is compared by value.
    pub fn account_round_trip(&self, account: &Account) -> Result<(), Error> {
        let raw = self.invoke(Program::Account, Inputs::new().with("account", account.clone()))?;

        Ok(verify_account_round_trip(account, &raw)?)
    }

    /// Sends `state` through the VM and checks it comes back equivalent, account by account.
    pub fn state_round_trip(&self, state: &State) -> Result<(), Error> {
        let raw = self.invoke(Program::State, Inputs::new().with("state", state.clone()))?;

        Ok(verify_state_round_trip(state, &raw)?)
    }

    /// Runs the scenario described by `fixture`.
    pub fn run_fixture(&self, fixture: &Fixture) -> Result<(), Error> {
        let start_time = Instant::now();
        let outcome = match fixture {
            Fixture::Os { block, state } => self.run_os(block, state).map(|_| ()),
            Fixture::Block(block) => self.block_round_trip(block),
            Fixture::Account(account) => self.account_round_trip(account),
            Fixture::State(state) => self.state_round_trip(state),
        };

        info!(
            kind = fixture.kind(),
            program = %fixture.program(),
            passed = outcome.is_ok(),
            elapsed = ?start_time.elapsed(),
            "scenario finished"
        );
        outcome
    }

    /// A differential tester driving this harness's VM. Its invocations are limited by
    /// `config.timeout` rather than the harness timeout.
    fn tester(
        &self,
        config: EcMulConfig,
    ) -> DifferentialTester<impl Invoker + Send + Sync + 'static> {
        let timed = self.invoker.clone();
        let invoker =
            move |program: Program, inputs: &Inputs| timed.inner().invoke(program, inputs);

        DifferentialTester::new(invoker, config)
    }

    /// Runs the differential EC multiplication test, keeping every trial's verdict.
    pub fn ec_mul_report(&self, config: EcMulConfig) -> EcMulReport {
        self.tester(config).run()
    }

    /// Runs the differential EC multiplication test. Fails with the first failing trial.
    pub fn ec_mul(&self, config: EcMulConfig) -> Result<EcMulReport, Error> {
        Ok(self.ec_mul_report(config).into_result()?)
    }

    /// Replays the single random EC multiplication trial drawn from `seed`.
    pub fn ec_mul_replay(&self, config: EcMulConfig, seed: u64) -> Result<Trial, Error> {
        Ok(self.tester(config).replay(seed)?)
    }
}

/// Builds the differential tester's configuration from the user's configuration.
pub fn ec_mul_config(configuration: &Configuration) -> Result<EcMulConfig, Error> {
    let invalid = |key: &str, reason: String| mimir_config::error::Error::InvalidValue {
        key: key.to_string(),
        reason,
    };
    let curve = configuration.curve.parse::<Curve>().map_err(|reason| invalid("curve", reason))?;

    EcMulConfigBuilder::new()
        .trials(configuration.ec_mul_trials)
        .seed(configuration.ec_mul_seed)
        .timeout(configuration.timeout())
        .curve(curve)
        .threads(configuration.ec_mul_threads)
        .build()
        .map_err(|e| invalid("ec_mul", e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use mimir_model::{encode::Encode, fixtures, parse_account};
    use mimir_vm::{execution_failure, LoopbackVm};

    use super::*;

    fn block() -> Block {
        parse_block(&fixtures::block()).expect("fixture parses")
    }

    #[test]
    fn test_block_round_trip_reports_first_difference() {
        let tampering = |_: Program, inputs: &Inputs| -> Result<RawResult, mimir_vm::Error> {
            let mut raw = inputs.to_native()["block"].clone();
            raw["blockHeader"]["gasUsed"] = "0x01".into();
            Ok(raw)
        };
        let harness = Harness::new(tampering, Duration::from_secs(5));

        match harness.block_round_trip(&block()) {
            Err(Error::Oracle(mimir_oracle::Error::EquivalenceMismatch(mismatch))) => {
                assert_eq!(mismatch.field, "blockHeader.gasUsed");
                assert_eq!(mismatch.expected, "0x156f8");
                assert_eq!(mismatch.actual, "0x1");
            }
            other => panic!("expected a mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_vm_failure_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let failing = move |program: Program, inputs: &Inputs| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<RawResult, _>(execution_failure(program, inputs, "out of steps"))
        };
        let harness = Harness::new(failing, Duration::from_secs(5));
        let account = parse_account(&fixtures::account()).expect("fixture parses");

        let err = harness.account_round_trip(&account).expect_err("vm fails");
        assert!(matches!(err, Error::Vm(mimir_vm::Error::ExecutionFailure { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unparsable_result() {
        let echo_account = |_: Program, inputs: &Inputs| -> Result<RawResult, mimir_vm::Error> {
            let mut raw = inputs.to_native()["account"].clone();
            raw["code"] = "0xzz".into();
            Ok(raw)
        };
        let harness = Harness::new(echo_account, Duration::from_secs(5));
        let account = parse_account(&fixtures::account()).expect("fixture parses");

        let err = harness.account_round_trip(&account).expect_err("code is not hex");
        assert!(matches!(err, Error::Oracle(mimir_oracle::Error::Model(_))));
    }

    #[test]
    fn test_run_fixture_on_loopback() {
        let harness = Harness::new(LoopbackVm::new(), Duration::from_secs(30));
        for (name, fixture) in Fixture::builtins().expect("built-in fixtures parse") {
            harness.run_fixture(&fixture).unwrap_or_else(|e| panic!("{name} failed: {e}"));
        }
    }

    #[test]
    fn test_from_configuration() {
        let harness = Harness::from_configuration(&Configuration::default());
        assert!(matches!(harness.invoker(), Backend::Loopback(_)));
        assert_eq!(harness.timeout(), Duration::from_secs(60));

        let configuration = Configuration {
            vm_command: "keth-runner".to_string(),
            vm_args: vec!["--release".to_string()],
            timeout_ms: 1_500,
            ..Default::default()
        };
        let harness = Harness::from_configuration(&configuration);
        assert_eq!(harness.invoker().name(), "keth-runner");
        assert_eq!(harness.timeout(), Duration::from_millis(1_500));
    }

    #[test]
    fn test_ec_mul_config() {
        let configuration = Configuration {
            ec_mul_trials: 3,
            ec_mul_seed: Some(42),
            ec_mul_threads: 2,
            curve: "bn254".to_string(),
            ..Default::default()
        };
        let config = ec_mul_config(&configuration).expect("valid configuration");

        assert_eq!(config.trials, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.threads, 2);
        assert_eq!(config.curve, Curve::AltBn128);

        let configuration = Configuration { curve: "secp256k1".to_string(), ..Default::default() };
        assert!(matches!(
            ec_mul_config(&configuration),
            Err(Error::Config(mimir_config::error::Error::InvalidValue { ref key, .. }))
                if key == "curve"
        ));
    }

    #[test]
    fn test_ec_mul_replay() {
        let harness = Harness::new(LoopbackVm::new(), Duration::from_secs(30));
        let config = EcMulConfig { seed: Some(5), ..Default::default() };

        let trial = harness.ec_mul_replay(config, 1234).expect("trial agrees");
        assert_eq!(trial.seed, 1234);
    }

    #[test]
    fn test_native_inputs_round_trip() {
        let block = block();
        assert_eq!(parse_block(&block.to_native()).expect("native parses"), block);
    }
}
