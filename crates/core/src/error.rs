//! Error types for Nexus Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown app: {app}")]
    UnknownApp {
        app: String,
        /// Every id the command table knows, in table order
        available: Vec<String>,
    },

    #[error("Failed to launch {app}: {source}")]
    Spawn {
        app: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid power action: {0}")]
    InvalidPowerAction(String),

    #[error("Status probe failed: {0}")]
    StatusProbe(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
