//! Nexus TV - home-screen launch service
//!
//! Local HTTP service behind the TV dashboard. Launches streaming apps and
//! media players in kiosk mode, reports host status, and shuts down or
//! restarts the host on request.

use std::process::ExitCode;
use std::sync::Arc;

use nexus_core::{Config, SystemRunner};
use nexus_net::{AppState, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod platform;

fn main() -> ExitCode {
    let flags = match cli::Command::parse(std::env::args().skip(1)) {
        Ok(cli::Command::Serve(flags)) => flags,
        Ok(cli::Command::Help) => {
            print!("{}", cli::help_text());
            return ExitCode::SUCCESS;
        }
        Ok(cli::Command::Version) => {
            println!("nexus-tv {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("nexus-tv: {}\n\n{}", e, cli::help_text());
            return ExitCode::from(2);
        }
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Nexus TV");

    let config = match load_config(&flags) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    platform::log_platform_info(&config.launch.display);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(flags: &cli::Flags) -> nexus_core::Result<Config> {
    let mut config =
        Config::load(flags.config.as_deref())?.with_env_overrides(|key| std::env::var(key).ok())?;
    if let Some(port) = flags.port {
        config.server.port = port;
    }
    Ok(config)
}

async fn run(config: Config) -> Result<(), String> {
    // Probe once; the result is fixed for the life of the process
    let browser = config.browser_probe().detect();

    let state = AppState::from_config(&config, browser, Arc::new(SystemRunner))
        .map_err(|e| format!("Failed to build app table: {}", e))?;
    tracing::info!(
        apps = state.dispatcher.apps().len(),
        browser = %state.dispatcher.browser().binary,
        display = %state.dispatcher.display(),
        power_delay_ms = state.power.delay().as_millis() as u64,
        "App table ready"
    );

    let server = Server::start(config.bind_addr(), Arc::new(state))
        .await
        .map_err(|e| e.to_string())?;

    shutdown_signal().await;

    server.shutdown();
    server.wait().await.map_err(|e| e.to_string())?;
    tracing::info!("Stopped");
    Ok(())
}

/// Resolve on ctrl-c, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received ctrl-c"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
