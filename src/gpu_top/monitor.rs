//! Lifecycle of the `intel_gpu_top -J` child process.

use crate::utils::config::SHUTDOWN_GRACE_MS;
use crate::utils::error::GpuTopError;
use log::debug;
use std::fmt;
use std::io::Read;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How to launch the JSON monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuTopCommand {
    bin: String,
    period_ms: u64,
}

impl GpuTopCommand {
    /// Create a command sampling every `period_ms` milliseconds
    pub fn new(bin: impl Into<String>, period_ms: u64) -> Self {
        Self {
            bin: bin.into(),
            period_ms,
        }
    }

    /// Arguments passed to the binary
    pub fn args(&self) -> Vec<String> {
        vec!["-J".to_string(), "-s".to_string(), self.period_ms.to_string()]
    }

    /// Start the monitor with stdout and stderr piped
    ///
    /// **Public** - called once per exporter run
    ///
    /// # Errors
    /// * `GpuTopError::SpawnFailed` - binary missing or not executable
    pub fn spawn(&self) -> Result<GpuTopProcess, GpuTopError> {
        let child = Command::new(&self.bin)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GpuTopError::SpawnFailed {
                command: self.to_string(),
                source,
            })?;

        Ok(GpuTopProcess {
            child,
            command: self.to_string(),
        })
    }
}

impl fmt::Display for GpuTopCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.bin, self.args().join(" "))
    }
}

/// A running monitor
#[derive(Debug)]
pub struct GpuTopProcess {
    child: Child,
    command: String,
}

/// What happened to the monitor when it was shut down
#[derive(Debug)]
pub struct ExitReport {
    /// Exit status as reported by the OS
    pub status: ExitStatus,

    /// Whether the process was still running and had to be killed
    pub killed: bool,

    /// Everything the process wrote to stderr
    pub stderr: String,
}

impl ExitReport {
    /// The process exited on its own with a failure status
    pub fn failed(&self) -> bool {
        !self.killed && !self.status.success()
    }
}

impl GpuTopProcess {
    /// Take the stdout pipe; can only be done once
    ///
    /// # Errors
    /// * `GpuTopError::MissingStdout` - pipe already taken
    pub fn take_stdout(&mut self) -> Result<ChildStdout, GpuTopError> {
        self.child
            .stdout
            .take()
            .ok_or_else(|| GpuTopError::MissingStdout(self.command.clone()))
    }

    /// Stop the monitor and collect its exit status and stderr
    ///
    /// **Public** - called once the monitor's stdout has ended
    ///
    /// A process that closed its stdout is normally exiting; it gets
    /// `SHUTDOWN_GRACE_MS` to do so before it is killed.
    ///
    /// # Errors
    /// * `GpuTopError::WaitFailed` - the OS could not report the exit status
    pub fn shutdown(self) -> Result<ExitReport, GpuTopError> {
        self.shutdown_with_grace(Duration::from_millis(SHUTDOWN_GRACE_MS))
    }

    /// Like [`GpuTopProcess::shutdown`] with an explicit grace period
    ///
    /// # Errors
    /// * `GpuTopError::WaitFailed` - the OS could not report the exit status
    pub fn shutdown_with_grace(mut self, grace: Duration) -> Result<ExitReport, GpuTopError> {
        let wait_failed = |command: &str, source| GpuTopError::WaitFailed {
            command: command.to_string(),
            source,
        };

        let deadline = Instant::now() + grace;
        let (status, killed) = loop {
            let exited = self
                .child
                .try_wait()
                .map_err(|e| wait_failed(&self.command, e))?;

            if let Some(status) = exited {
                break (status, false);
            }

            if Instant::now() >= deadline {
                if let Err(e) = self.child.kill() {
                    debug!("Kill of {} failed: {}", self.command, e);
                }
                let status = self.child.wait().map_err(|e| wait_failed(&self.command, e))?;
                break (status, true);
            }

            thread::sleep(EXIT_POLL_INTERVAL);
        };

        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            if let Err(e) = pipe.read_to_string(&mut stderr) {
                debug!("Could not read stderr of {}: {}", self.command, e);
            }
        }

        debug!("{} exited with {} (killed: {})", self.command, status, killed);

        Ok(ExitReport {
            status,
            killed,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let command = GpuTopCommand::new("intel_gpu_top", 500);

        assert_eq!(command.args(), vec!["-J", "-s", "500"]);
        assert_eq!(command.to_string(), "intel_gpu_top -J -s 500");
    }

    #[test]
    fn test_spawn_missing_binary() {
        let command = GpuTopCommand::new("/nonexistent/intel_gpu_top", 1000);

        match command.spawn() {
            Err(GpuTopError::SpawnFailed { command, .. }) => {
                assert_eq!(command, "/nonexistent/intel_gpu_top -J -s 1000");
            }
            other => panic!("expected spawn failure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_can_only_be_taken_once() {
        let mut process = GpuTopCommand::new("echo", 1000).spawn().unwrap();

        let mut stdout = process.take_stdout().unwrap();
        assert!(matches!(
            process.take_stdout(),
            Err(GpuTopError::MissingStdout(_))
        ));

        let mut echoed = String::new();
        stdout.read_to_string(&mut echoed).unwrap();
        assert_eq!(echoed, "-J -s 1000\n");

        let report = process.shutdown().unwrap();
        assert!(!report.killed);
        assert!(!report.failed());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_monitor_is_reported() {
        // `false` ignores its arguments and exits 1 without output; repeated
        // because the exit races the end of stdout
        for _ in 0..20 {
            let mut process = GpuTopCommand::new("false", 1000).spawn().unwrap();

            let mut output = String::new();
            process.take_stdout().unwrap().read_to_string(&mut output).unwrap();
            assert!(output.is_empty());

            let report = process.shutdown().unwrap();
            assert!(!report.killed);
            assert!(report.failed());
            assert_eq!(report.status.code(), Some(1));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_running_monitor_is_killed_after_grace() {
        // `yes` never exits; its stdout stays open so it blocks on a full pipe
        let process = GpuTopCommand::new("yes", 1000).spawn().unwrap();

        let report = process
            .shutdown_with_grace(Duration::from_millis(50))
            .unwrap();

        assert!(report.killed);
        assert!(!report.failed());
        assert!(!report.status.success());
    }
}
