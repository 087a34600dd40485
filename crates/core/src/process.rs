//! Process runner
//!
//! Every OS command the service issues goes through [`ProcessRunner`]:
//! launched apps, deferred power commands and the status probes.
//! Launched apps are NOT supervised. The runner hands back a
//! [`LaunchedProcess`] that callers may wait on, but by default they drop
//! it and the program keeps running on its own.

use std::io;
use std::process::{ExitStatus, Stdio};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A shell command line plus extra environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// Passed verbatim to `sh -c`
    pub script: String,
    pub env: Vec<(String, String)>,
}

impl ShellCommand {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            env: Vec::new(),
        }
    }

    /// Set an environment variable for the spawned shell
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Display form, `KEY=value script`, the way it would be typed
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = self.env.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        parts.push(self.script.clone());
        parts.join(" ")
    }
}

/// Captured result of a command run to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
}

/// A process started by the runner
pub struct LaunchedProcess {
    /// Unique ID for this launch
    pub id: Uuid,
    /// Command line that was issued
    pub command: String,
    /// When it was spawned
    pub launched_at: DateTime<Utc>,
    /// Process ID (for logging only - not for control)
    pub pid: Option<u32>,
    /// Child handle (None when the runner does not own a real process)
    child: Option<tokio::process::Child>,
}

impl LaunchedProcess {
    pub fn new(command: String, pid: Option<u32>, child: Option<tokio::process::Child>) -> Self {
        Self {
            id: Uuid::new_v4(),
            command,
            launched_at: Utc::now(),
            pid,
            child,
        }
    }

    /// Wait for the process to exit
    ///
    /// Returns `None` if there is no child to wait on.
    pub async fn wait(mut self) -> io::Result<Option<ExitStatus>> {
        match self.child.take() {
            Some(mut child) => child.wait().await.map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for LaunchedProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchedProcess")
            .field("id", &self.id)
            .field("command", &self.command)
            .field("launched_at", &self.launched_at)
            .field("pid", &self.pid)
            .finish()
    }
}

/// Seam between the service and the host OS
pub trait ProcessRunner: Send + Sync + 'static {
    /// Start a shell command in the background and return immediately
    fn spawn(&self, command: &ShellCommand) -> io::Result<LaunchedProcess>;

    /// Run a program to completion and capture its stdout (blocking)
    fn output(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput>;
}

/// Runner backed by real OS processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn spawn(&self, command: &ShellCommand) -> io::Result<LaunchedProcess> {
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c")
            .arg(&command.script)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Own process group so the app outlives the request and the service
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn()?;
        let pid = child.id();
        Ok(LaunchedProcess::new(command.display(), pid, Some(child)))
    }

    fn output(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let output = std::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Check if a command exists in PATH, returning its resolved path
pub fn which(cmd: &str) -> Option<String> {
    let output = std::process::Command::new("which")
        .arg(cmd)
        .stderr(Stdio::null())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!path.is_empty()).then_some(path)
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingRunner;

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;

    use super::{CommandOutput, LaunchedProcess, ProcessRunner, ShellCommand};

    /// Runner double that records commands instead of executing them
    #[derive(Default)]
    pub struct RecordingRunner {
        spawned: Mutex<Vec<ShellCommand>>,
        outputs: Mutex<HashMap<String, CommandOutput>>,
        fail_spawn: bool,
    }

    impl RecordingRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// A runner whose every spawn fails
        pub fn failing() -> Self {
            Self {
                fail_spawn: true,
                ..Self::default()
            }
        }

        /// Canned stdout for `program`; unknown programs fail to run
        pub fn with_output(self, program: &str, success: bool, stdout: &str) -> Self {
            self.outputs.lock().unwrap().insert(
                program.to_string(),
                CommandOutput {
                    success,
                    stdout: stdout.to_string(),
                },
            );
            self
        }

        pub fn spawned(&self) -> Vec<ShellCommand> {
            self.spawned.lock().unwrap().clone()
        }
    }

    impl ProcessRunner for RecordingRunner {
        fn spawn(&self, command: &ShellCommand) -> io::Result<LaunchedProcess> {
            if self.fail_spawn {
                return Err(io::Error::new(io::ErrorKind::NotFound, "sh not found"));
            }
            self.spawned.lock().unwrap().push(command.clone());
            Ok(LaunchedProcess::new(command.display(), None, None))
        }

        fn output(&self, program: &str, _args: &[&str]) -> io::Result<CommandOutput> {
            self.outputs
                .lock()
                .unwrap()
                .get(program)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, program.to_string()))
        }
    }
}
