//! Shared handler state
//!
//! Built once at startup and read-only afterwards, so handlers share it
//! through an `Arc` without locking.

use std::path::PathBuf;
use std::sync::Arc;

use nexus_core::catalog::{builtin_apps, merge_apps};
use nexus_core::{
    AppCommandTable, Browser, Config, LaunchDispatcher, PowerController, ProcessRunner,
    StatusReporter,
};

pub struct AppState {
    pub dispatcher: LaunchDispatcher,
    pub power: PowerController,
    pub status: StatusReporter,
    /// Served by `GET /install.sh`
    pub install_script: PathBuf,
}

impl AppState {
    /// Wire the services from config and the already-detected browser
    pub fn from_config(
        config: &Config,
        browser: Browser,
        runner: Arc<dyn ProcessRunner>,
    ) -> nexus_core::Result<Self> {
        let apps = merge_apps(builtin_apps(), &config.apps)?;
        let table = AppCommandTable::resolve(apps, &browser)?;

        Ok(Self {
            dispatcher: LaunchDispatcher::new(
                table,
                browser,
                config.launch.display.clone(),
                runner.clone(),
            ),
            power: PowerController::new(runner.clone(), config.power_delay()),
            status: StatusReporter::new(runner),
            install_script: config.install.script_path.clone(),
        })
    }
}
