//! Host status probe
//!
//! Reads uptime and hostname from the OS. Never fails: any probe error
//! degrades to a fixed fallback status.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::process::ProcessRunner;

/// Version reported to the dashboard
pub const SERVICE_VERSION: &str = "1.0.0";

/// Hostname reported when the probe fails
pub const FALLBACK_HOSTNAME: &str = "nexus-tv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemStatus {
    pub status: String,
    pub uptime: String,
    pub hostname: String,
    pub version: String,
}

impl SystemStatus {
    pub fn running(uptime: String, hostname: String) -> Self {
        Self {
            status: "running".to_string(),
            uptime,
            hostname,
            version: SERVICE_VERSION.to_string(),
        }
    }

    /// Status used whenever the probe fails
    pub fn fallback() -> Self {
        Self::running("unknown".to_string(), FALLBACK_HOSTNAME.to_string())
    }
}

pub struct StatusReporter {
    runner: Arc<dyn ProcessRunner>,
}

impl StatusReporter {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Current host status
    pub async fn status(&self) -> SystemStatus {
        let runner = self.runner.clone();
        let probed = tokio::task::spawn_blocking(move || probe(runner.as_ref()))
            .await
            .map_err(|e| Error::StatusProbe(e.to_string()))
            .and_then(|r| r);

        match probed {
            Ok((uptime, hostname)) => SystemStatus::running(uptime, hostname),
            Err(e) => {
                debug!(error = %e, "Status probe failed, reporting fallback");
                SystemStatus::fallback()
            }
        }
    }
}

/// Both probes must succeed or the whole status falls back
fn probe(runner: &dyn ProcessRunner) -> Result<(String, String)> {
    let uptime = run_probe(runner, "uptime", &["-p"])?;
    let hostname = run_probe(runner, "hostname", &[])?;
    Ok((uptime, hostname))
}

fn run_probe(runner: &dyn ProcessRunner, program: &str, args: &[&str]) -> Result<String> {
    let output = runner
        .output(program, args)
        .map_err(|e| Error::StatusProbe(format!("{}: {}", program, e)))?;

    if !output.success {
        return Err(Error::StatusProbe(format!("{} exited with failure", program)));
    }
    Ok(output.stdout.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RecordingRunner;

    #[tokio::test]
    async fn test_status_from_probes() {
        let runner = RecordingRunner::new()
            .with_output("uptime", true, "up 2 hours, 5 minutes\n")
            .with_output("hostname", true, "living-room\n");
        let reporter = StatusReporter::new(Arc::new(runner));

        let status = reporter.status().await;
        assert_eq!(
            status,
            SystemStatus {
                status: "running".into(),
                uptime: "up 2 hours, 5 minutes".into(),
                hostname: "living-room".into(),
                version: "1.0.0".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_binary_falls_back() {
        let runner = RecordingRunner::new().with_output("hostname", true, "living-room\n");
        let reporter = StatusReporter::new(Arc::new(runner));

        let status = reporter.status().await;
        assert_eq!(status, SystemStatus::fallback());
        assert_eq!(status.uptime, "unknown");
        assert_eq!(status.hostname, "nexus-tv");
    }

    #[tokio::test]
    async fn test_failing_hostname_discards_uptime() {
        let runner = RecordingRunner::new()
            .with_output("uptime", true, "up 1 minute\n")
            .with_output("hostname", false, "");
        let reporter = StatusReporter::new(Arc::new(runner));

        assert_eq!(reporter.status().await, SystemStatus::fallback());
    }
}
