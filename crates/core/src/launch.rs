//! Launch dispatcher
//!
//! Resolves an app id to its command and spawns it detached against the
//! local display. Success means the command was issued, nothing more:
//! the dispatcher never waits for the app or checks that it came up.

use std::sync::Arc;

use tracing::{info, warn};

use crate::browser::Browser;
use crate::catalog::{AppCommandTable, AppInfo};
use crate::error::{Error, Result};
use crate::process::{LaunchedProcess, ProcessRunner, ShellCommand};

pub struct LaunchDispatcher {
    table: AppCommandTable,
    browser: Browser,
    display: String,
    runner: Arc<dyn ProcessRunner>,
}

impl LaunchDispatcher {
    pub fn new(
        table: AppCommandTable,
        browser: Browser,
        display: String,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            table,
            browser,
            display,
            runner,
        }
    }

    /// Launch an app by id
    ///
    /// Unknown ids never reach the runner. Each call spawns a new process,
    /// even if the same app was launched a moment ago.
    pub fn launch(&self, app_id: &str) -> Result<LaunchedProcess> {
        let app = self.table.get(app_id).ok_or_else(|| Error::UnknownApp {
            app: app_id.to_string(),
            available: self.table.ids(),
        })?;

        let command = ShellCommand::new(app.command.clone()).env("DISPLAY", self.display.clone());

        match self.runner.spawn(&command) {
            Ok(process) => {
                info!(
                    app = %app.id,
                    launch_id = %process.id,
                    pid = ?process.pid,
                    command = %process.command,
                    "Launched app"
                );
                Ok(process)
            }
            Err(e) => {
                warn!(app = %app.id, command = %app.command, error = %e, "Failed to launch app");
                Err(Error::Spawn {
                    app: app.id.clone(),
                    source: e,
                })
            }
        }
    }

    /// Resolved shell command for an app, if known
    pub fn command_for(&self, app_id: &str) -> Option<&str> {
        self.table.get(app_id).map(|a| a.command.as_str())
    }

    pub fn apps(&self) -> Vec<AppInfo> {
        self.table.app_infos()
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_apps;
    use crate::process::RecordingRunner;

    fn dispatcher(runner: Arc<RecordingRunner>) -> LaunchDispatcher {
        let browser = Browser::new("/usr/bin/chromium-browser");
        let table = AppCommandTable::resolve(builtin_apps(), &browser).unwrap();
        LaunchDispatcher::new(table, browser, ":0".to_string(), runner)
    }

    #[test]
    fn test_unknown_app_never_spawns() {
        let runner = Arc::new(RecordingRunner::new());
        let dispatcher = dispatcher(runner.clone());

        for id in ["", "pause", "NETFLIX", "netflix ", "../kodi"] {
            match dispatcher.launch(id) {
                Err(Error::UnknownApp { app, available }) => {
                    assert_eq!(app, id);
                    assert_eq!(available.len(), 10);
                    assert_eq!(available[0], "plex");
                }
                other => panic!("expected UnknownApp for {:?}, got {:?}", id, other),
            }
        }
        assert!(runner.spawned().is_empty());
    }

    #[test]
    fn test_known_app_spawns_on_display() {
        let runner = Arc::new(RecordingRunner::new());
        let dispatcher = dispatcher(runner.clone());

        let process = dispatcher.launch("netflix").unwrap();
        assert!(process.command.starts_with("DISPLAY=:0 /usr/bin/chromium-browser"));

        let spawned = runner.spawned();
        assert_eq!(spawned.len(), 1);
        assert!(spawned[0].script.contains("netflix.com/browse"));
        assert!(spawned[0].script.contains("/usr/bin/chromium-browser"));
        assert_eq!(spawned[0].env, vec![("DISPLAY".to_string(), ":0".to_string())]);
    }

    #[test]
    fn test_resolved_commands_use_browser() {
        let dispatcher = dispatcher(Arc::new(RecordingRunner::new()));
        assert_eq!(dispatcher.browser().binary, "/usr/bin/chromium-browser");
        assert_eq!(dispatcher.display(), ":0");

        let netflix = dispatcher.command_for("netflix").unwrap();
        assert!(netflix.contains(&dispatcher.browser().binary));
        assert!(netflix.contains("netflix.com/browse"));

        assert_eq!(dispatcher.command_for("kodi"), Some("kodi"));
        assert_eq!(dispatcher.command_for("vlc"), None);
    }

    #[test]
    fn test_every_known_app_launches() {
        let runner = Arc::new(RecordingRunner::new());
        let dispatcher = dispatcher(runner.clone());

        for app in dispatcher.apps() {
            assert!(dispatcher.launch(&app.id).is_ok());
        }
        assert_eq!(runner.spawned().len(), 10);
    }

    #[test]
    fn test_repeated_launch_is_not_deduplicated() {
        let runner = Arc::new(RecordingRunner::new());
        let dispatcher = dispatcher(runner.clone());

        dispatcher.launch("kodi").unwrap();
        dispatcher.launch("kodi").unwrap();

        let spawned = runner.spawned();
        assert_eq!(spawned.len(), 2);
        assert_eq!(spawned[0], spawned[1]);
    }

    #[test]
    fn test_spawn_failure_reported() {
        let runner = Arc::new(RecordingRunner::failing());
        let dispatcher = dispatcher(runner);

        let err = dispatcher.launch("spotify").unwrap_err();
        assert!(matches!(err, Error::Spawn { ref app, .. } if app == "spotify"));
    }
}
