/// Keyword inputs to VM programs
pub mod inputs;

/// The invocation boundary
pub mod invoker;

/// Program identifiers exposed by the VM
pub mod program;

/// Time-limited invocation
pub mod timeout;
