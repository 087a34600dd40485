//! Display server detection
//!
//! Launched apps are pointed at the configured X display. This module only
//! reports what the service itself sees, so a headless start (e.g. from a
//! system unit before the session is up) shows up in the logs.

use std::env;

/// Detected display server type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    /// Native Wayland session
    Wayland,
    /// X11 session (native or XWayland)
    X11,
    /// Unknown or headless
    Unknown,
}

impl DisplayServer {
    /// Detect the current display server from environment
    pub fn detect() -> Self {
        Self::detect_with(|key| env::var(key).ok())
    }

    pub fn detect_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup("WAYLAND_DISPLAY").is_some() {
            return DisplayServer::Wayland;
        }

        if lookup("DISPLAY").is_some() {
            return DisplayServer::X11;
        }

        DisplayServer::Unknown
    }
}

impl std::fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayServer::Wayland => write!(f, "Wayland"),
            DisplayServer::X11 => write!(f, "X11"),
            DisplayServer::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Log platform information at startup
pub fn log_platform_info(launch_display: &str) {
    let display_server = DisplayServer::detect();
    tracing::info!(
        display_server = %display_server,
        launch_display = %launch_display,
        "Display server detected"
    );

    if display_server == DisplayServer::Unknown {
        tracing::warn!(
            launch_display = %launch_display,
            "No display in service environment, apps will target the configured display"
        );
    }

    if let Ok(session_type) = env::var("XDG_SESSION_TYPE") {
        tracing::debug!(session_type = %session_type, "XDG session type");
    }
}
