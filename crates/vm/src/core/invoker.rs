use mimir_model::RawResult;

use crate::{
    core::{inputs::Inputs, program::Program},
    error::Error,
};

/// The boundary to the VM under test: run one program on keyword inputs and return its raw
/// result. Invocation is synchronous and blocking.
pub trait Invoker {
    /// Runs `program` on `inputs`.
    fn invoke(&self, program: Program, inputs: &Inputs) -> Result<RawResult, Error>;
}

impl<F> Invoker for F
where
    F: Fn(Program, &Inputs) -> Result<RawResult, Error>,
{
    fn invoke(&self, program: Program, inputs: &Inputs) -> Result<RawResult, Error> {
        self(program, inputs)
    }
}

/// Builds an [`Error::ExecutionFailure`] for `program` invoked with `inputs`.
pub fn execution_failure(program: Program, inputs: &Inputs, reason: impl Into<String>) -> Error {
    Error::ExecutionFailure { program, inputs: inputs.summary(), reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_closure_invoker() {
        let echo = |program: Program, inputs: &Inputs| -> Result<RawResult, Error> {
            Ok(json!({ "program": program.identifier(), "inputs": inputs.to_native() }))
        };

        let result = echo
            .invoke(Program::EcMul, &Inputs::new().with("scalar", U256::from(3)))
            .expect("closure returns");
        assert_eq!(result["program"], "test__ecmul_impl");
        assert_eq!(result["inputs"]["scalar"]["low"], "0x3");
    }

    #[test]
    fn test_failure_message() {
        let inputs = Inputs::new().with("x", U256::ZERO).with("y", U256::ZERO);
        let err = execution_failure(Program::EcMul, &inputs, "missing input 'scalar'");

        assert_eq!(
            err.to_string(),
            "execution of 'test__ecmul_impl' failed (inputs: x, y): missing input 'scalar'"
        );
    }
}
