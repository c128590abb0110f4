//! Integration tests for the differential EC multiplication test.

mod integration_tests {
    use std::time::Duration;

    use mimir_core::{
        mimir_model::RawResult,
        mimir_precompile::{
            Case, EcMulConfig, EcMulConfigBuilder, EcMulReport, Error as PrecompileError,
        },
        mimir_vm::{Error as VmError, Inputs, LoopbackVm, Program},
        Error, Harness,
    };

    fn config(trials: usize, seed: u64) -> EcMulConfig {
        EcMulConfigBuilder::new()
            .trials(trials)
            .seed(Some(seed))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("valid config")
    }

    #[test]
    fn test_ec_mul_edge_cases() {
        mimir_tracing::init_test_tracing();
        let harness = Harness::new(LoopbackVm::new(), Duration::from_secs(30));

        let report = harness.ec_mul(config(0, 7)).expect("edge cases agree");
        let covers = |case: Case| report.records.iter().any(|record| record.trial.case == case);

        assert_eq!(report.planned, report.executed());
        assert!(covers(Case::ZeroScalar));
        assert!(covers(Case::GroupOrder));
        assert!(covers(Case::PointAtInfinity));
        assert!(covers(Case::ZeroScalarRandomPoint));
    }

    #[test]
    fn test_ec_mul_is_reproducible() {
        let harness = Harness::new(LoopbackVm::new(), Duration::from_secs(30));
        let inputs = |report: &EcMulReport| {
            report
                .records
                .iter()
                .map(|record| (record.trial.scalar, record.trial.point))
                .collect::<Vec<_>>()
        };

        let first = harness.ec_mul(config(2, 99)).expect("trials agree");
        let second = harness.ec_mul(config(2, 99)).expect("trials agree");
        assert_eq!(inputs(&first), inputs(&second));
    }

    #[test]
    fn test_ec_mul_timeout_fails_the_run() {
        let stalled = |_: Program, _: &Inputs| -> Result<RawResult, VmError> {
            std::thread::sleep(Duration::from_secs(2));
            Ok(RawResult::Null)
        };
        let harness = Harness::new(stalled, Duration::from_secs(30));
        let config = EcMulConfig { timeout: Duration::from_millis(20), ..config(0, 1) };

        let err = harness.ec_mul(config).expect_err("every trial times out");
        let Error::Precompile(PrecompileError::TrialFailed { seed, trial, source, .. }) = err else {
            panic!("expected a failed trial, got {err}");
        };
        assert_eq!((seed, trial), (1, 0));
        assert!(matches!(*source, PrecompileError::Vm(VmError::ExecutionTimeout { .. })));
    }

    #[test]
    fn test_ec_mul_report_keeps_every_failure() {
        let stalled = |_: Program, _: &Inputs| -> Result<RawResult, VmError> {
            std::thread::sleep(Duration::from_secs(2));
            Ok(RawResult::Null)
        };
        let harness = Harness::new(stalled, Duration::from_secs(30));
        let config = EcMulConfig { timeout: Duration::from_millis(20), ..config(1, 64) };

        let report = harness.ec_mul_report(config);
        assert_eq!(report.failures().count(), report.planned);
        assert!(report
            .failures()
            .all(|record| record.outcome.as_ref().err().and_then(|e| e.seed()) == Some(64)));
    }

    #[test]
    #[ignore = "slow: 20 randomized trials, each paying full invocation overhead"]
    fn test_ec_mul_randomized() {
        let harness = Harness::new(LoopbackVm::new(), Duration::from_secs(60));

        let report = harness.ec_mul(EcMulConfig::default()).expect("all trials agree");
        assert_eq!(report.executed(), report.planned);
        assert_eq!(report.passed(), report.planned);
    }
}
