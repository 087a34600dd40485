//! Service configuration
//!
//! Loaded from a TOML file. Every section is optional; a missing file
//! means defaults throughout.
//!
//! Lookup order: explicit path, `NEXUS_TV_CONFIG`, then
//! `<config dir>/config.toml` from the platform project directories.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::browser::{BrowserProbe, DEFAULT_BROWSER, DEFAULT_BROWSER_CANDIDATES};
use crate::error::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "NEXUS_TV_CONFIG";

/// Environment variable overriding `server.port`
pub const PORT_ENV: &str = "PORT";

/// Top-level config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub launch: LaunchConfig,
    pub power: PowerConfig,
    pub install: InstallConfig,
    /// Extra or overriding apps
    pub apps: Vec<AppConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// X display the spawned apps attach to
    pub display: String,
    /// Browser paths probed in order
    pub browser_candidates: Vec<PathBuf>,
    /// Browser name used when no candidate exists
    pub default_browser: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            display: ":0".to_string(),
            browser_candidates: DEFAULT_BROWSER_CANDIDATES.iter().map(PathBuf::from).collect(),
            default_browser: DEFAULT_BROWSER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Delay between acknowledging and running the power command
    pub delay_ms: u64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub script_path: PathBuf,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from("scripts/install.sh"),
        }
    }
}

/// An `[[apps]]` entry; exactly one of `url` and `command` must be set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
}

impl Config {
    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `path`, or from the default location if `None`
    ///
    /// An explicitly named file must exist; the default file may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(
            path,
            |key| std::env::var(key).ok(),
            Self::default_path(),
        )
    }

    /// [`Config::load`] with the environment and default location supplied
    pub fn load_from<F>(path: Option<&Path>, env: F, default_path: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (path, explicit) = match (path, env(CONFIG_ENV)) {
            (Some(p), _) => (p.to_path_buf(), true),
            (None, Some(p)) => (PathBuf::from(p), true),
            (None, None) => match default_path {
                Some(p) => (p, false),
                None => {
                    tracing::debug!("No config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            if explicit {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// `<config dir>/config.toml` for this platform
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "nexus", "nexus-tv").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply environment overrides through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{} is not a valid port: {}", PORT_ENV, port)))?;
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn power_delay(&self) -> Duration {
        Duration::from_millis(self.power.delay_ms)
    }

    pub fn browser_probe(&self) -> BrowserProbe {
        BrowserProbe::new(
            self.launch.browser_candidates.clone(),
            self.launch.default_browser.clone(),
        )
    }

    fn validate(&self) -> Result<()> {
        if self.launch.display.trim().is_empty() {
            return Err(Error::Config("launch.display must not be empty".into()));
        }
        if self.launch.default_browser.trim().is_empty() {
            return Err(Error::Config("launch.default_browser must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.launch.display, ":0");
        assert_eq!(config.power_delay(), Duration::from_millis(1000));
        assert_eq!(config.launch.browser_candidates.len(), DEFAULT_BROWSER_CANDIDATES.len());
        assert!(config.apps.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080

[launch]
display = ":1"
browser_candidates = ["/usr/bin/firefox"]
default_browser = "firefox"

[power]
delay_ms = 250

[install]
script_path = "/opt/nexus/install.sh"

[[apps]]
id = "jellyfin"
name = "Jellyfin"
url = "http://localhost:8096"

[[apps]]
id = "steam"
command = "steam -bigpicture"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.launch.display, ":1");
        assert_eq!(config.launch.browser_candidates, vec![PathBuf::from("/usr/bin/firefox")]);
        assert_eq!(config.power.delay_ms, 250);
        assert_eq!(config.install.script_path, PathBuf::from("/opt/nexus/install.sh"));
        assert_eq!(config.apps.len(), 2);
        assert_eq!(config.apps[1].command.as_deref(), Some("steam -bigpicture"));
    }

    #[test]
    fn test_blank_display_rejected() {
        let result = Config::from_toml("[launch]\ndisplay = \" \"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_port_override() {
        let config = Config::default()
            .with_env_overrides(|key| (key == PORT_ENV).then(|| "3000".to_string()))
            .unwrap();
        assert_eq!(config.server.port, 3000);

        let bad = Config::default().with_env_overrides(|_| Some("nope".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[power]\ndelay_ms = 10\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.power.delay_ms, 10);

        let missing = dir.path().join("missing.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    fn write_config(dir: &Path, name: &str, delay_ms: u64) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("[power]\ndelay_ms = {}\n", delay_ms)).unwrap();
        path
    }

    #[test]
    fn test_env_path_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = write_config(dir.path(), "env.toml", 20);
        let default = write_config(dir.path(), "default.toml", 30);
        let env_value = env_path.to_string_lossy().into_owned();

        let config = Config::load_from(
            None,
            |key| (key == CONFIG_ENV).then(|| env_value.clone()),
            Some(default),
        )
        .unwrap();
        assert_eq!(config.power.delay_ms, 20);
    }

    #[test]
    fn test_env_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let default = write_config(dir.path(), "default.toml", 30);
        let missing = dir.path().join("missing.toml").to_string_lossy().into_owned();

        let result = Config::load_from(
            None,
            |key| (key == CONFIG_ENV).then(|| missing.clone()),
            Some(default),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_path_beats_env() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = write_config(dir.path(), "explicit.toml", 10);
        let env_value = write_config(dir.path(), "env.toml", 20)
            .to_string_lossy()
            .into_owned();

        let config = Config::load_from(
            Some(&explicit),
            |key| (key == CONFIG_ENV).then(|| env_value.clone()),
            None,
        )
        .unwrap();
        assert_eq!(config.power.delay_ms, 10);
    }

    #[test]
    fn test_default_path_optional() {
        let dir = tempfile::tempdir().unwrap();

        let absent = Config::load_from(None, |_| None, Some(dir.path().join("config.toml"))).unwrap();
        assert_eq!(absent.power.delay_ms, 1000);

        let no_dirs = Config::load_from(None, |_| None, None).unwrap();
        assert_eq!(no_dirs.server.port, 5000);

        let present = write_config(dir.path(), "config.toml", 40);
        let config = Config::load_from(None, |_| None, Some(present)).unwrap();
        assert_eq!(config.power.delay_ms, 40);
    }
}
