//! External command execution
//!
//! Runs a fixed binary with an argument vector — never through a shell, so
//! user input can't be interpolated into a command line. Every invocation is
//! bounded by a timeout and normalized into a result-or-error contract.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{ChurnError, Result};

/// Options for a single command invocation
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Working directory for the child process
    pub current_dir: Option<PathBuf>,
    /// Full replacement environment; `None` inherits the ambient environment
    pub env: Option<HashMap<String, String>>,
    /// Hard deadline for the invocation
    pub timeout: Duration,
}

impl RunOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            current_dir: None,
            env: None,
            timeout,
        }
    }
}

/// Captured output of a completed command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Runs a single external binary with bounded execution time
#[derive(Debug, Clone)]
pub struct CommandRunner {
    binary: String,
}

impl CommandRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run the binary with the given argument vector
    ///
    /// Spawns exactly one child process and suspends the caller until it
    /// finishes or the timeout fires. On timeout the child is killed
    /// (`kill_on_drop`) and `ChurnError::Timeout` is returned. A non-zero
    /// exit maps to `NonZeroExit` carrying the trimmed stderr (or stdout, or
    /// the exit-code text) as detail; a signal death maps to
    /// `SignalTermination`.
    pub async fn run(&self, args: &[&str], opts: RunOptions) -> Result<CommandOutput> {
        debug!(binary = %self.binary, ?args, "running command");

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &opts.current_dir {
            cmd.current_dir(dir);
        }
        if let Some(env) = &opts.env {
            cmd.env_clear().envs(env);
        }

        let output = match timeout(opts.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => return Err(ChurnError::Spawn(err)),
            Err(_) => return Err(ChurnError::Timeout(opts.timeout)),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            return Ok(CommandOutput {
                stdout,
                stderr,
                exit_code: 0,
            });
        }

        match output.status.code() {
            Some(code) => {
                let detail = non_zero_detail(&stdout, &stderr, code);
                Err(ChurnError::NonZeroExit { code, detail })
            }
            None => Err(ChurnError::SignalTermination {
                signal: termination_signal(&output.status),
            }),
        }
    }
}

/// Failure detail for a non-zero exit: trimmed stderr, else trimmed stdout,
/// else the exit code itself
fn non_zero_detail(stdout: &str, stderr: &str, code: i32) -> String {
    let stderr = stderr.trim();
    let stdout = stdout.trim();
    if !stderr.is_empty() {
        stderr.to_string()
    } else if !stdout.is_empty() {
        stdout.to_string()
    } else {
        format!("exit code {code}")
    }
}

#[cfg(unix)]
fn termination_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(timeout: Duration) -> RunOptions {
        RunOptions::with_timeout(timeout)
    }

    #[test]
    fn test_non_zero_detail_prefers_stderr() {
        assert_eq!(non_zero_detail("out", "err", 1), "err");
        assert_eq!(non_zero_detail("out", "  ", 1), "out");
        assert_eq!(non_zero_detail("", "", 7), "exit code 7");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stdout() {
        let runner = CommandRunner::new("echo");
        let output = runner
            .run(&["hello"], opts(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.exit_code, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_non_zero_exit() {
        let runner = CommandRunner::new("false");
        let err = runner.run(&[], opts(Duration::from_secs(5))).await.unwrap_err();
        assert!(matches!(err, ChurnError::NonZeroExit { code: 1, .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_times_out() {
        let runner = CommandRunner::new("sleep");
        let err = runner
            .run(&["5"], opts(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, ChurnError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_run_spawn_failure() {
        let runner = CommandRunner::new("definitely-not-a-real-binary-1b2f");
        let err = runner.run(&[], opts(Duration::from_secs(5))).await.unwrap_err();
        assert!(matches!(err, ChurnError::Spawn(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_respects_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = opts(Duration::from_secs(5));
        options.current_dir = Some(dir.path().to_path_buf());

        let runner = CommandRunner::new("pwd");
        let output = runner.run(&[], options).await.unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(output.stdout.trim(), expected.to_string_lossy());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_replaces_environment() {
        let mut env = HashMap::new();
        env.insert("CHURN_TEST_MARKER".to_string(), "present".to_string());

        let mut options = opts(Duration::from_secs(5));
        options.env = Some(env);

        // Absolute path: with env_clear there is no PATH to resolve against
        let runner = CommandRunner::new("/usr/bin/env");
        let output = runner.run(&[], options).await.unwrap();
        assert!(output.stdout.contains("CHURN_TEST_MARKER=present"));
        // env_clear dropped everything that wasn't in the replacement map
        assert!(!output.stdout.contains("PATH="));
    }
}
