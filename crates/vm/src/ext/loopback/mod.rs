//! An in-process stand-in for the VM under test, used to exercise the harness end to end
//! without the real VM.
//!
//! It answers every program the way the real VM does: results come back in the VM-native
//! encoding, returned storage is keyed by `keccak256(slot)`, and EC multiplication is
//! computed with its own 256-bit modular arithmetic.

pub mod ecmul;

use alloy::primitives::{keccak256, U256};
use mimir_common::codec::encode_prefixed;
use mimir_model::{
    encode::{encode_uint, Encode, Encoding},
    Account, Block, RawResult, State, Storage,
};
use serde_json::{json, Map, Value};
use tracing::trace;

use crate::{
    core::{
        inputs::{Input, Inputs},
        invoker::{execution_failure, Invoker},
        program::Program,
    },
    error::Error,
};

/// The in-process loopback VM.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopbackVm;

impl LoopbackVm {
    /// Creates a loopback VM.
    pub fn new() -> Self {
        Self
    }
}

/// Renders storage the way the VM reports it: keyed by the hash of the 32 byte slot.
fn hashed_storage(storage: &Storage) -> Value {
    let map: Map<String, Value> = storage
        .iter()
        .map(|(key, value)| {
            let hashed = keccak256(key.to_be_bytes::<32>());
            (encode_prefixed(hashed.as_slice()), encode_uint(*value, Encoding::Native))
        })
        .collect();
    Value::Object(map)
}

fn account_result(account: &Account) -> Value {
    let mut result = account.to_native();
    result["storage"] = hashed_storage(&account.storage);
    result
}

fn state_result(state: &State) -> Value {
    let map: Map<String, Value> = state
        .iter()
        .map(|(address, account)| (encode_prefixed(address.as_slice()), account_result(account)))
        .collect();
    Value::Object(map)
}

struct Args<'a> {
    program: Program,
    inputs: &'a Inputs,
}

impl<'a> Args<'a> {
    fn get(&self, keyword: &str) -> Result<&'a Input, Error> {
        self.inputs.get(keyword).ok_or_else(|| {
            execution_failure(self.program, self.inputs, format!("missing input '{keyword}'"))
        })
    }

    fn mismatched(&self, keyword: &str, expected: &str) -> Error {
        let reason = format!("input '{keyword}' is not {expected}");
        execution_failure(self.program, self.inputs, reason)
    }

    fn block(&self, keyword: &str) -> Result<&'a Block, Error> {
        match self.get(keyword)? {
            Input::Block(block) => Ok(block),
            _ => Err(self.mismatched(keyword, "a block")),
        }
    }

    fn account(&self, keyword: &str) -> Result<&'a Account, Error> {
        match self.get(keyword)? {
            Input::Account(account) => Ok(account),
            _ => Err(self.mismatched(keyword, "an account")),
        }
    }

    fn state(&self, keyword: &str) -> Result<&'a State, Error> {
        match self.get(keyword)? {
            Input::State(state) => Ok(state),
            _ => Err(self.mismatched(keyword, "a state")),
        }
    }

    fn word(&self, keyword: &str) -> Result<U256, Error> {
        match self.get(keyword)? {
            Input::Word(word) => Ok(*word),
            _ => Err(self.mismatched(keyword, "a word")),
        }
    }
}

impl Invoker for LoopbackVm {
    fn invoke(&self, program: Program, inputs: &Inputs) -> Result<RawResult, Error> {
        let args = Args { program, inputs };
        trace!(%program, inputs = %inputs.summary(), "loopback invocation");

        match program {
            Program::Os => {
                let block = args.block("block")?;
                let state = args.state("state")?;

                // a transaction from an unknown sender cannot be applied
                let unknown = block.transactions.iter().find(|tx| state.get(&tx.sender).is_none());
                if let Some(tx) = unknown {
                    return Err(execution_failure(
                        program,
                        inputs,
                        format!("sender {} is not in the pre-state", tx.sender),
                    ));
                }

                Ok(json!({
                    "blockNumber": block.header.number,
                    "transactions": block.transactions.len(),
                }))
            }
            Program::Block => Ok(args.block("block")?.to_native()),
            Program::Account => Ok(account_result(args.account("account")?)),
            Program::State => Ok(state_result(args.state("state")?)),
            Program::EcMul => {
                let (x, y) = ecmul::ec_mul(args.word("x")?, args.word("y")?, args.word("scalar")?)
                    .ok_or_else(|| execution_failure(program, inputs, "point is not on curve"))?;

                Ok(json!({
                    "x": encode_uint(x, Encoding::Native),
                    "y": encode_uint(y, Encoding::Native),
                }))
            }
        }
    }
}
