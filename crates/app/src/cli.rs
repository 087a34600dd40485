//! Command-line flags

use std::path::PathBuf;

/// What the process was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve(Flags),
    Help,
    Version,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    /// Config file to load instead of the default location
    pub config: Option<PathBuf>,
    /// Override `server.port`
    pub port: Option<u16>,
}

const HELP: &[(&str, &str)] = &[
    ("--config <path>", "Load configuration from this TOML file."),
    ("--port <port>", "Listen on this port (overrides config and PORT)."),
    ("--version", "Print the version of the service."),
    ("--help", "Show this help message."),
];

impl Command {
    /// Parse arguments, excluding the program name
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = Flags::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "-V" | "--version" => return Ok(Command::Version),
                "--config" => {
                    let value = args.next().ok_or("--config needs a path")?;
                    flags.config = Some(PathBuf::from(value));
                }
                "--port" => {
                    let value = args.next().ok_or("--port needs a number")?;
                    let port = value
                        .parse()
                        .map_err(|_| format!("invalid port: {}", value))?;
                    flags.port = Some(port);
                }
                other => return Err(format!("unknown argument: {}", other)),
            }
        }

        Ok(Command::Serve(flags))
    }
}

pub fn help_text() -> String {
    let mut text = String::from("Usage: nexus-tv [FLAGS]\n\nFlags:\n");
    for (flag, description) in HELP {
        text.push_str(&format!("  {:<18} {}\n", flag, description));
    }
    text
}
