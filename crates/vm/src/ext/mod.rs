/// The in-process loopback VM
pub mod loopback;

/// The VM under test as an external command
pub mod process;

use mimir_model::RawResult;

use crate::{
    core::{inputs::Inputs, invoker::Invoker, program::Program},
    error::Error,
};
use loopback::LoopbackVm;
use process::ProcessVm;

/// The VM backends the harness can drive.
#[derive(Debug, Clone)]
pub enum Backend {
    /// An external VM runner.
    Process(ProcessVm),
    /// The in-process loopback VM.
    Loopback(LoopbackVm),
}

impl Backend {
    /// Selects the external runner if a command is given, and the loopback VM otherwise.
    pub fn from_command(command: Option<&str>, args: &[String]) -> Self {
        match command {
            Some(command) if !command.trim().is_empty() => {
                Backend::Process(ProcessVm::new(command).with_args(args.iter().cloned()))
            }
            _ => Backend::Loopback(LoopbackVm::new()),
        }
    }

    /// A short name for logs.
    pub fn name(&self) -> &str {
        match self {
            Backend::Process(vm) => vm.command(),
            Backend::Loopback(_) => "loopback",
        }
    }
}

impl Invoker for Backend {
    fn invoke(&self, program: Program, inputs: &Inputs) -> Result<RawResult, Error> {
        match self {
            Backend::Process(vm) => vm.invoke(program, inputs),
            Backend::Loopback(vm) => vm.invoke(program, inputs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection() {
        assert!(matches!(Backend::from_command(None, &[]), Backend::Loopback(_)));
        assert!(matches!(Backend::from_command(Some("  "), &[]), Backend::Loopback(_)));

        let backend = Backend::from_command(Some("keth-runner"), &["--fast".to_string()]);
        assert_eq!(backend.name(), "keth-runner");
    }
}
