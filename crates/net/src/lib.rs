//! Nexus Network Library
//!
//! HTTP surface of the Nexus TV dashboard service.
//!
//! # Architecture
//!
//! - **Server**: binds the listener and serves the router on a background task
//! - **Routes**: axum handlers over the shared [`AppState`]
//! - **Protocol**: JSON bodies as the dashboard client reads them
//!
//! # Usage
//!
//! ```ignore
//! let state = AppState::from_config(&config, browser, Arc::new(SystemRunner))?;
//! let server = Server::start(config.bind_addr(), Arc::new(state)).await?;
//!
//! tokio::signal::ctrl_c().await?;
//! server.shutdown();
//! server.wait().await?;
//! ```

pub mod error;
pub mod protocol;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{Error, Result};
pub use protocol::{AppsResponse, LaunchResponse, PowerResponse};
pub use routes::router;
pub use server::Server;
pub use state::AppState;
