use std::{
    io::{ErrorKind, Read, Write},
    process::{Child, ChildStdin, Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use mimir_model::RawResult;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    core::{
        inputs::Inputs,
        invoker::{execution_failure, Invoker},
        program::Program,
    },
    error::Error,
};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Runs the VM under test as an external command.
///
/// Each invocation spawns `<command> <args...> <program>`, writes the inputs as one JSON
/// object in the VM-native encoding to its stdin, and reads the result as JSON from its
/// stdout. A non-zero exit status, or output that is not JSON, is an execution failure.
/// With a timeout set, the child is killed once it is exceeded.
#[derive(Debug, Clone)]
pub struct ProcessVm {
    command: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessVm {
    /// Creates a runner for `command`, with no extra arguments and no timeout.
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), args: Vec::new(), timeout: None }
    }

    /// Sets the arguments passed before the program identifier.
    pub fn with_args<S: Into<String>>(mut self, args: impl IntoIterator<Item = S>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Kills the child if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The command this runner spawns.
    pub fn command(&self) -> &str {
        &self.command
    }
}

fn drain<R: Read + Send + 'static>(source: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut source) = source {
            source.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

/// Writes the payload to the child's stdin and closes it.
fn feed(stdin: Option<ChildStdin>, payload: Vec<u8>) -> JoinHandle<std::io::Result<()>> {
    thread::spawn(move || match stdin {
        Some(mut stdin) => match stdin.write_all(&payload) {
            // the VM may exit without reading its input; its status tells the story
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
            written => written,
        },
        None => Ok(()),
    })
}

/// Kills and reaps a child that is being given up on.
fn reap(child: &mut Child) {
    let _ = child.kill();
    if let Err(e) = child.wait() {
        warn!("failed to reap vm process: {e}");
    }
}

fn collect(handle: JoinHandle<std::io::Result<Vec<u8>>>) -> Result<Vec<u8>, String> {
    handle
        .join()
        .map_err(|_| "output reader panicked".to_string())?
        .map_err(|e| format!("failed to read output: {e}"))
}

impl ProcessVm {
    /// Waits for the child, killing it once the deadline passes. Returns `None` on timeout.
    fn wait(&self, child: &mut Child) -> std::io::Result<Option<ExitStatus>> {
        let Some(timeout) = self.timeout else {
            return child.wait().map(Some);
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                child.kill()?;
                child.wait()?;
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Invoker for ProcessVm {
    fn invoke(&self, program: Program, inputs: &Inputs) -> Result<RawResult, Error> {
        let failure = |reason: String| execution_failure(program, inputs, reason);

        let payload = serde_json::to_vec(&inputs.to_native())
            .map_err(|e| failure(format!("failed to serialize inputs: {e}")))?;

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg(program.identifier())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| failure(format!("failed to spawn command `{}`: {e}", self.command)))?;
        trace!(%program, command = %self.command, bytes = payload.len(), "spawned vm process");

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let stdin = feed(child.stdin.take(), payload);

        // the deadline runs while the inputs are still being written
        let status = match self.wait(&mut child) {
            Ok(status) => status,
            Err(e) => {
                reap(&mut child);
                return Err(failure(format!("failed waiting for process exit: {e}")));
            }
        };
        let Some(status) = status else {
            warn!(%program, command = %self.command, "vm process killed after timeout");
            return Err(Error::ExecutionTimeout {
                program,
                timeout: self.timeout.unwrap_or_default(),
            });
        };

        stdin
            .join()
            .map_err(|_| failure("input writer panicked".to_string()))?
            .map_err(|e| failure(format!("failed to write inputs: {e}")))?;
        let stdout = collect(stdout).map_err(&failure)?;
        let stderr = collect(stderr).map_err(&failure)?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            return Err(failure(format!(
                "command exited with status {}{}",
                status.code().map_or_else(|| "signal".to_string(), |code| code.to_string()),
                if stderr.is_empty() { String::new() } else { format!("; stderr={stderr}") }
            )));
        }

        let result: Value = serde_json::from_slice(&stdout)
            .map_err(|e| failure(format!("invalid JSON response: {e}")))?;
        debug!(%program, command = %self.command, "vm process returned");
        Ok(result)
    }
}
