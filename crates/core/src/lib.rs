//! Nexus Core Library
//!
//! App catalog, browser detection, launch dispatch, power control and
//! status probing for the Nexus TV dashboard service.

pub mod browser;
pub mod catalog;
pub mod config;
pub mod error;
pub mod launch;
pub mod power;
pub mod process;
pub mod status;

pub use browser::{Browser, BrowserFamily, BrowserProbe};
pub use catalog::{AppCommandTable, AppEntry, AppInfo, AppTarget, ResolvedApp};
pub use config::Config;
pub use error::{Error, Result};
pub use launch::LaunchDispatcher;
pub use power::{PowerAction, PowerController, ScheduledPower};
pub use process::{LaunchedProcess, ProcessRunner, ShellCommand, SystemRunner};
pub use status::{StatusReporter, SystemStatus};
