use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::error::{CorralError, CorralResult};

/// Outcome of one external command invocation
#[derive(Debug, Clone, Copy)]
pub struct CommandOutcome {
    /// Exit code of the process, -1 when unavailable (timeout or signal)
    pub exit_code: i32,
    /// True when the process did not finish within the allotted timeout
    pub timed_out: bool,
    /// Wall-clock time between spawn and outcome
    pub elapsed: Duration,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.exit_code == 0
    }
}

/// Capability to launch one external command.
///
/// Stateless per call; a single starter may be shared by any number of
/// environments running concurrently.
#[async_trait]
pub trait CommandStarter: Send + Sync {
    /// Launch `executable` with `args` and hand back a waitable handle
    async fn start(
        &self,
        executable: &str,
        args: &[String],
    ) -> CorralResult<Box<dyn CommandHandle>>;
}

/// Handle on one launched command
#[async_trait]
pub trait CommandHandle: Send {
    /// Block until the command finishes or `timeout` expires
    async fn wait(&mut self, timeout: Duration) -> CorralResult<CommandOutcome>;
}

/// Real command starter backed by `tokio::process`
#[derive(Debug, Default)]
pub struct ProcessStarter;

impl ProcessStarter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandStarter for ProcessStarter {
    async fn start(
        &self,
        executable: &str,
        args: &[String],
    ) -> CorralResult<Box<dyn CommandHandle>> {
        let child = Command::new(executable)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                CorralError::command(format!("failed to spawn '{}': {}", executable, err))
            })?;

        Ok(Box::new(ProcessHandle {
            child,
            started: Instant::now(),
        }))
    }
}

/// Handle on a spawned child process.
///
/// A child that outlives its timeout is killed here; the orchestrator only
/// ever observes `timed_out` on the outcome.
pub struct ProcessHandle {
    child: Child,
    started: Instant,
}

#[async_trait]
impl CommandHandle for ProcessHandle {
    async fn wait(&mut self, timeout: Duration) -> CorralResult<CommandOutcome> {
        match tokio::time::timeout(timeout, self.child.wait()).await {
            Ok(Ok(status)) => Ok(CommandOutcome {
                exit_code: status.code().unwrap_or(-1),
                timed_out: false,
                elapsed: self.started.elapsed(),
            }),
            Ok(Err(err)) => Err(CorralError::command(format!(
                "failed waiting for child process: {}",
                err
            ))),
            Err(_) => {
                let _ = self.child.start_kill();
                Ok(CommandOutcome {
                    exit_code: -1,
                    timed_out: true,
                    elapsed: self.started.elapsed(),
                })
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    async fn run(starter: &ProcessStarter, script: &str, timeout: Duration) -> CommandOutcome {
        let args = vec!["-c".to_string(), script.to_string()];
        let mut handle = starter.start("sh", &args).await.unwrap();
        handle.wait(timeout).await.unwrap()
    }

    #[tokio::test]
    async fn reports_zero_exit_code() {
        let outcome = run(&ProcessStarter::new(), "exit 0", Duration::from_secs(5)).await;
        assert!(outcome.succeeded());
        assert_eq!(outcome.exit_code, 0);
        assert!(!outcome.timed_out);
    }

    #[tokio::test]
    async fn reports_nonzero_exit_code() {
        let outcome = run(&ProcessStarter::new(), "exit 3", Duration::from_secs(5)).await;
        assert!(!outcome.succeeded());
        assert_eq!(outcome.exit_code, 3);
        assert!(!outcome.timed_out);
    }

    #[tokio::test]
    async fn reports_timeout_for_slow_command() {
        let outcome = run(&ProcessStarter::new(), "sleep 5", Duration::from_millis(50)).await;
        assert!(outcome.timed_out);
        assert!(!outcome.succeeded());
        assert!(outcome.elapsed >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn start_fails_for_missing_executable() {
        let starter = ProcessStarter::new();
        let result = starter
            .start("corral-no-such-binary", &["x".to_string()])
            .await;
        assert!(matches!(result, Err(CorralError::Command(_))));
    }
}
