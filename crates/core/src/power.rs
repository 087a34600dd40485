//! Power control
//!
//! A valid request is acknowledged right away; the privileged command runs
//! on a detached timer so the HTTP response can flush before the host goes
//! down. Armed timers cannot be cancelled and are not deduplicated.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::process::{ProcessRunner, ShellCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Shutdown,
    Restart,
}

impl PowerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shutdown => "shutdown",
            Self::Restart => "restart",
        }
    }

    /// Privileged OS command for this action
    pub fn command(&self) -> &'static str {
        match self {
            Self::Shutdown => "sudo shutdown -h now",
            Self::Restart => "sudo reboot",
        }
    }

    /// Acknowledgment sent to the caller
    pub fn message(&self) -> &'static str {
        match self {
            Self::Shutdown => "Shutting down...",
            Self::Restart => "Restarting...",
        }
    }
}

impl FromStr for PowerAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "shutdown" => Ok(Self::Shutdown),
            "restart" => Ok(Self::Restart),
            other => Err(Error::InvalidPowerAction(other.to_string())),
        }
    }
}

/// A power command waiting on its timer
#[derive(Debug)]
pub struct ScheduledPower {
    pub action: PowerAction,
    handle: JoinHandle<()>,
}

impl ScheduledPower {
    pub fn message(&self) -> &'static str {
        self.action.message()
    }

    /// Wait until the command has been issued
    pub async fn fired(self) {
        if let Err(e) = self.handle.await {
            error!(error = %e, "Power task panicked");
        }
    }
}

pub struct PowerController {
    runner: Arc<dyn ProcessRunner>,
    delay: Duration,
}

impl PowerController {
    pub fn new(runner: Arc<dyn ProcessRunner>, delay: Duration) -> Self {
        Self { runner, delay }
    }

    /// Validate `action` and arm the deferred command
    ///
    /// Must be called from within a tokio runtime.
    pub fn power(&self, action: &str) -> Result<ScheduledPower> {
        let action: PowerAction = action.parse()?;
        Ok(self.schedule(action))
    }

    /// Arm the deferred command for an already-validated action
    pub fn schedule(&self, action: PowerAction) -> ScheduledPower {
        let runner = self.runner.clone();
        let delay = self.delay;

        info!(action = action.as_str(), delay_ms = delay.as_millis() as u64, "Power action armed");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let command = ShellCommand::new(action.command());
            match runner.spawn(&command) {
                Ok(process) => {
                    info!(action = action.as_str(), command = %process.command, "Power command issued");
                    match process.wait().await {
                        Ok(Some(status)) if !status.success() => {
                            warn!(action = action.as_str(), status = %status, "Power command failed");
                        }
                        Err(e) => {
                            warn!(action = action.as_str(), error = %e, "Power command wait failed");
                        }
                        _ => {}
                    }
                }
                Err(e) => {
                    error!(action = action.as_str(), error = %e, "Failed to issue power command");
                }
            }
        });

        ScheduledPower { action, handle }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RecordingRunner;

    fn controller(runner: Arc<RecordingRunner>) -> PowerController {
        PowerController::new(runner, Duration::from_millis(1000))
    }

    #[test]
    fn test_delay_is_kept() {
        let power = controller(Arc::new(RecordingRunner::new()));
        assert_eq!(power.delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!("shutdown".parse::<PowerAction>().unwrap(), PowerAction::Shutdown);
        assert_eq!("restart".parse::<PowerAction>().unwrap(), PowerAction::Restart);
        assert!("pause".parse::<PowerAction>().is_err());
        assert!("Shutdown".parse::<PowerAction>().is_err());
        assert!("".parse::<PowerAction>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_is_deferred() {
        let runner = Arc::new(RecordingRunner::new());
        let power = controller(runner.clone());

        let scheduled = power.power("shutdown").unwrap();
        assert_eq!(scheduled.message(), "Shutting down...");

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(runner.spawned().is_empty());

        scheduled.fired().await;
        let spawned = runner.spawned();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].script, "sudo shutdown -h now");
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_runs_reboot() {
        let runner = Arc::new(RecordingRunner::new());
        let power = controller(runner.clone());

        let scheduled = power.power("restart").unwrap();
        assert_eq!(scheduled.message(), "Restarting...");
        scheduled.fired().await;

        let spawned = runner.spawned();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].script, "sudo reboot");
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_action_schedules_nothing() {
        let runner = Arc::new(RecordingRunner::new());
        let power = controller(runner.clone());

        let err = power.power("pause").unwrap_err();
        assert!(matches!(err, Error::InvalidPowerAction(ref a) if a == "pause"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(runner.spawned().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_requests_arm_two_timers() {
        let runner = Arc::new(RecordingRunner::new());
        let power = controller(runner.clone());

        let first = power.power("restart").unwrap();
        let second = power.power("restart").unwrap();
        first.fired().await;
        second.fired().await;

        assert_eq!(runner.spawned().len(), 2);
    }
}
