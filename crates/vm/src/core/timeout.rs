use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{bounded, RecvTimeoutError};
use mimir_model::RawResult;
use tracing::{debug, warn};

use crate::{
    core::{
        inputs::Inputs,
        invoker::{execution_failure, Invoker},
        program::Program,
    },
    error::Error,
};

/// Wraps an [`Invoker`] with a time limit. Each invocation runs on its own worker thread; if
/// it has not returned within the limit, the caller gets [`Error::ExecutionTimeout`] and the
/// worker is abandoned. Failed or timed out invocations are never retried.
#[derive(Debug)]
pub struct TimedInvoker<I> {
    inner: Arc<I>,
    timeout: Duration,
}

impl<I> Clone for TimedInvoker<I> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner), timeout: self.timeout }
    }
}

impl<I> TimedInvoker<I> {
    /// Wraps `inner`, allowing each invocation at most `timeout`.
    pub fn new(inner: I, timeout: Duration) -> Self {
        Self { inner: Arc::new(inner), timeout }
    }

    /// The time limit per invocation.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The wrapped invoker.
    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I> Invoker for TimedInvoker<I>
where
    I: Invoker + Send + Sync + 'static,
{
    fn invoke(&self, program: Program, inputs: &Inputs) -> Result<RawResult, Error> {
        let (sender, receiver) = bounded(1);
        let inner = Arc::clone(&self.inner);
        let worker_inputs = inputs.clone();
        let start_time = Instant::now();

        thread::Builder::new()
            .name(format!("vm-{program}"))
            .spawn(move || {
                // the receiver is gone if the caller already timed out
                let _ = sender.send(inner.invoke(program, &worker_inputs));
            })
            .map_err(|e| {
                execution_failure(program, inputs, format!("failed to spawn worker: {e}"))
            })?;

        match receiver.recv_timeout(self.timeout) {
            Ok(result) => {
                debug!(
                    %program,
                    elapsed = ?start_time.elapsed(),
                    ok = result.is_ok(),
                    "invocation returned"
                );
                result
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(%program, timeout = ?self.timeout, "invocation timed out");
                Err(Error::ExecutionTimeout { program, timeout: self.timeout })
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(execution_failure(program, inputs, "vm worker panicked"))
            }
        }
    }
}
