//! Bounded execution of external commands.
//!
//! Every ffprobe/ffmpeg call goes through [`run_with_timeout`], which
//! guarantees the child process is killed and reaped on every exit path
//! and hands back a structured result instead of raw pipe contents.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Poll interval while waiting for a child process to finish.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Failures at the process-execution layer.
///
/// Callers fold these into their own error variants; the distinction
/// between "never started" and "started but timed out" matters for the
/// messages shown to the user.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to start '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{tool}' timed out after {}s and was killed", .timeout.as_secs())]
    Timeout { tool: String, timeout: Duration },

    #[error("failed while waiting for '{tool}': {source}")]
    Wait {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

/// Structured result of one finished command.
#[derive(Debug)]
pub struct CommandOutput {
    /// Exit status reported by the operating system.
    pub status: ExitStatus,
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
    /// Wall-clock time the command took.
    pub elapsed: Duration,
}

impl CommandOutput {
    /// Whether the command exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// At most `limit` characters of stderr, for diagnostics.
    #[must_use]
    pub fn stderr_excerpt(&self, limit: usize) -> &str {
        match self.stderr.char_indices().nth(limit) {
            Some((idx, _)) => &self.stderr[..idx],
            None => &self.stderr,
        }
    }
}

/// Runs `cmd` to completion, killing it once `timeout` elapses.
///
/// stdin is closed; stdout and stderr are captured. On timeout the child
/// is killed and waited on before the error is returned, so no zombie
/// process is left behind.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<CommandOutput, CommandError> {
    let tool = cmd.get_program().to_string_lossy().into_owned();
    log::debug!("Running: {}", render_command(&cmd));

    let start = Instant::now();
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| CommandError::Spawn { tool: tool.clone(), source })?;

    // Drain both pipes on threads so a chatty child cannot fill a pipe
    // buffer and deadlock against the wait loop below.
    let stdout_reader = spawn_pipe_reader(child.stdout.take());
    let stderr_reader = spawn_pipe_reader(child.stderr.take());

    let waited = wait_with_timeout(&mut child, &tool, timeout, start);

    // Both readers finish once the child is gone (killed or exited),
    // so joining here cannot hang.
    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();
    let status = waited?;

    Ok(CommandOutput {
        status,
        stdout,
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        elapsed: start.elapsed(),
    })
}

/// Polls the child until it exits or the deadline passes. The child is
/// killed and reaped on both error paths.
fn wait_with_timeout(
    child: &mut Child,
    tool: &str,
    timeout: Duration,
    start: Instant,
) -> Result<ExitStatus, CommandError> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    log::warn!("'{tool}' exceeded its {}s timeout; killing it", timeout.as_secs());
                    kill_and_reap(child);
                    return Err(CommandError::Timeout {
                        tool: tool.to_string(),
                        timeout,
                    });
                }
                std::thread::sleep(WAIT_POLL_INTERVAL);
            }
            Err(source) => {
                kill_and_reap(child);
                return Err(CommandError::Wait {
                    tool: tool.to_string(),
                    source,
                });
            }
        }
    }
}

fn spawn_pipe_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Renders a command line for log output.
fn render_command(cmd: &Command) -> String {
    let mut line = cmd.get_program().to_string_lossy().into_owned();
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
