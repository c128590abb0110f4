//! Integration tests for the block, account and state round trips.

mod integration_tests {
    use std::time::Duration;

    use mimir_core::{
        fixtures,
        mimir_model::{parse_account, parse_block, parse_state, RawResult},
        mimir_oracle::{Error as OracleError, Mismatch},
        mimir_vm::{Error as VmError, Inputs, Invoker, LoopbackVm, Program},
        Error, Harness,
    };
    use serde_json::{json, Value};

    /// A loopback VM whose results are altered by `tamper` before they are returned.
    fn tampering(
        tamper: impl Fn(&mut Value) + Send + Sync + 'static,
    ) -> Harness<impl Invoker + Send + Sync + 'static> {
        let vm = move |program: Program, inputs: &Inputs| -> Result<RawResult, VmError> {
            let mut result = LoopbackVm::new().invoke(program, inputs)?;
            tamper(&mut result);
            Ok(result)
        };
        Harness::new(vm, Duration::from_secs(30))
    }

    fn mismatch(outcome: Result<(), Error>) -> Mismatch {
        match outcome {
            Err(Error::Oracle(OracleError::EquivalenceMismatch(mismatch))) => mismatch,
            other => panic!("expected an equivalence mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_block_round_trip() {
        let block = parse_block(&fixtures::block()).expect("fixture parses");
        let harness = Harness::new(LoopbackVm::new(), Duration::from_secs(30));

        harness.block_round_trip(&block).expect("block round-trips");
    }

    #[test]
    fn test_block_round_trip_drops_transaction() {
        let block = parse_block(&fixtures::block()).expect("fixture parses");
        let harness = tampering(|result| {
            if let Some(transactions) = result["transactions"].as_array_mut() {
                transactions.pop();
            }
        });

        let mismatch = mismatch(harness.block_round_trip(&block));
        assert_eq!(mismatch, Mismatch::new("transactions.length", "2", "1"));
    }

    #[test]
    fn test_account_round_trip_concrete_scenario() {
        mimir_tracing::init_test_tracing();
        let account = parse_account(&fixtures::account()).expect("fixture parses");
        assert_eq!(account.nonce, 1);
        assert_eq!(account.code.len(), 141);

        let harness = Harness::new(LoopbackVm::new(), Duration::from_secs(30));
        harness.account_round_trip(&account).expect("account round-trips");
    }

    #[test]
    fn test_account_round_trip_wrong_storage_value() {
        let account = parse_account(&fixtures::account()).expect("fixture parses");
        let harness = tampering(|result| {
            if let Some(storage) = result["storage"].as_object_mut() {
                for value in storage.values_mut() {
                    *value = json!({ "low": "0xabde2", "high": "0x0" });
                }
            }
        });

        let mismatch = mismatch(harness.account_round_trip(&account));
        assert_eq!(mismatch.field, "storage.values");
        assert_eq!(mismatch.expected, "[(low: 0xabde1, high: 0x0)]");
        assert_eq!(mismatch.actual, "[(low: 0xabde2, high: 0x0)]");
    }

    #[test]
    fn test_account_round_trip_extra_slot() {
        let account = parse_account(&fixtures::account()).expect("fixture parses");
        let harness = tampering(|result| {
            result["storage"]["0x02"] = json!("0xabde1");
        });

        let mismatch = mismatch(harness.account_round_trip(&account));
        assert_eq!(mismatch, Mismatch::new("storage", "1 entries", "2 entries"));
    }

    #[test]
    fn test_account_round_trip_wrong_nonce() {
        let account = parse_account(&fixtures::account()).expect("fixture parses");
        let harness = tampering(|result| {
            result["nonce"] = json!(2);
        });

        let mismatch = mismatch(harness.account_round_trip(&account));
        assert_eq!(mismatch, Mismatch::new("nonce", "0x1", "0x2"));
    }

    #[test]
    fn test_state_round_trip() {
        let state = parse_state(&fixtures::state()).expect("fixture parses");
        assert_eq!(state.len(), 3);
        assert!(state.iter().any(|(_, account)| account.code.is_empty()));
        assert!(state.iter().any(|(_, account)| !account.storage.is_empty()));

        let harness = Harness::new(LoopbackVm::new(), Duration::from_secs(30));
        harness.state_round_trip(&state).expect("state round-trips");
    }

    #[test]
    fn test_state_round_trip_missing_account() {
        let state = parse_state(&fixtures::state()).expect("fixture parses");
        let harness = tampering(|result| {
            if let Some(accounts) = result.as_object_mut() {
                accounts.remove("0x000f3df6d732807ef1319fb7b8bb8522d0beac02");
            }
        });

        let mismatch = mismatch(harness.state_round_trip(&state));
        assert_eq!(mismatch, Mismatch::new("accounts", "3 accounts", "2 accounts"));
    }

    #[test]
    fn test_state_round_trip_wrong_storage_value() {
        let state = parse_state(&fixtures::state()).expect("fixture parses");
        let harness = tampering(|result| {
            let account = &mut result["0x000000000000000000000000000000000000c0de"];
            if let Some(storage) = account["storage"].as_object_mut() {
                if let Some(value) = storage.values_mut().next() {
                    *value = json!("0x00");
                }
            }
        });

        let mismatch = mismatch(harness.state_round_trip(&state));
        assert_eq!(mismatch.field, "0x000000000000000000000000000000000000c0de.storage.values");
    }
}
