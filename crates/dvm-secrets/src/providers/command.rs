//! External command execution port
//!
//! The keychain provider shells out to a helper binary. Running that
//! helper goes through `CommandRunner` so tests can substitute a fake and
//! never touch a real credential store.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::types::CancellationToken;
use super::error::{SecretError, SecretResult};

/// Captured result of a finished helper process
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

// stdout carries the secret, keep it out of any debug output
impl std::fmt::Debug for CommandOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandOutput")
            .field("exit_code", &self.exit_code)
            .field("stdout", &format!("[{} bytes]", self.stdout.len()))
            .field("stderr", &self.stderr)
            .finish()
    }
}

/// Runs an external program to completion
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, blocking until it exits
    ///
    /// Must return `SecretError::Cancelled` without spawning if `cancel` is
    /// already set, and must terminate the process if `cancel` fires while
    /// it is running. A non-zero exit is not an error at this level.
    fn run(&self, cancel: &CancellationToken, program: &str, args: &[String]) -> SecretResult<CommandOutput>;
}

/// `CommandRunner` backed by `std::process::Command`
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    poll_interval: Duration,
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
        }
    }

    /// How often the cancellation token is checked while the child runs
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, cancel: &CancellationToken, program: &str, args: &[String]) -> SecretResult<CommandOutput> {
        cancel.check()?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes while waiting so a chatty child cannot block on a full pipe
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = loop {
            if cancel.is_cancelled() {
                terminate(&mut child);
                return Err(SecretError::Cancelled);
            }
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(self.poll_interval),
                Err(e) => {
                    terminate(&mut child);
                    return Err(e.into());
                }
            }
        };

        Ok(CommandOutput {
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&join_reader(stdout)).into_owned(),
            stderr: String::from_utf8_lossy(&join_reader(stderr)).into_owned(),
        })
    }
}

/// Kill and reap a child we are abandoning
fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn spawn_reader<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
