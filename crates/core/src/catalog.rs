//! App catalog and command table
//!
//! The catalog lists the launchable apps; the command table is the catalog
//! resolved against the detected browser into one shell command per app.
//! Both keep insertion order, which is the order clients see.

use serde::Serialize;

use crate::browser::Browser;
use crate::config::AppConfig;
use crate::error::{Error, Result};

/// How an app is started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppTarget {
    /// Opened in the browser in kiosk mode
    Web { url: String },
    /// Run as a shell command (may chain fallbacks with `||`)
    Native { command: String },
}

/// A launchable app before browser resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub id: String,
    pub name: String,
    pub target: AppTarget,
}

impl AppEntry {
    pub fn web(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            name: display_name(id),
            target: AppTarget::Web {
                url: url.to_string(),
            },
        }
    }

    pub fn native(id: &str, command: &str) -> Self {
        Self {
            id: id.to_string(),
            name: display_name(id),
            target: AppTarget::Native {
                command: command.to_string(),
            },
        }
    }

    /// Build an entry from a config `[[apps]]` table
    pub fn from_config(app: &AppConfig) -> Result<Self> {
        let id = app.id.trim();
        if id.is_empty() {
            return Err(Error::Config("app id must not be empty".into()));
        }

        let target = match (&app.url, &app.command) {
            (Some(url), None) if !url.trim().is_empty() => AppTarget::Web {
                url: url.trim().to_string(),
            },
            (None, Some(command)) if !command.trim().is_empty() => AppTarget::Native {
                command: command.trim().to_string(),
            },
            (Some(_), Some(_)) => {
                return Err(Error::Config(format!(
                    "app '{}' sets both url and command",
                    id
                )))
            }
            _ => {
                return Err(Error::Config(format!(
                    "app '{}' needs a non-empty url or command",
                    id
                )))
            }
        };

        Ok(Self {
            id: id.to_string(),
            name: app.name.clone().unwrap_or_else(|| display_name(id)),
            target,
        })
    }
}

/// Built-in apps, in dashboard order
pub fn builtin_apps() -> Vec<AppEntry> {
    vec![
        AppEntry::web("plex", "http://localhost:32400/web"),
        AppEntry::native("kodi", "kodi"),
        AppEntry::web("netflix", "https://www.netflix.com/browse"),
        AppEntry::web("prime", "https://www.primevideo.com"),
        AppEntry::native("spotify", "spotify || flatpak run com.spotify.Client"),
        AppEntry::web("youtube", "https://www.youtube.com/tv"),
        AppEntry::native("freetube", "flatpak run io.freetubeapp.FreeTube"),
        AppEntry::native(
            "vacuumtube",
            "flatpak run rocks.shy.VacuumTube || /usr/local/bin/vacuumtube",
        ),
        AppEntry::web("kayo", "https://kayosports.com.au"),
        AppEntry::web("chaupal", "https://chaupal.tv"),
    ]
}

/// Merge config apps into the built-ins
///
/// An entry whose id already exists replaces it in place; new ids append.
pub fn merge_apps(mut apps: Vec<AppEntry>, extra: &[AppConfig]) -> Result<Vec<AppEntry>> {
    for app in extra {
        let entry = AppEntry::from_config(app)?;
        match apps.iter_mut().find(|a| a.id == entry.id) {
            Some(existing) => *existing = entry,
            None => apps.push(entry),
        }
    }
    Ok(apps)
}

/// Capitalize the first character of an id (`netflix` -> `Netflix`)
pub fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// An app with its resolved shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedApp {
    pub id: String,
    pub name: String,
    pub command: String,
}

/// App listing entry as served to the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct AppInfo {
    pub id: String,
    pub name: String,
    pub available: bool,
}

/// Immutable id -> command mapping built at startup
#[derive(Debug, Clone)]
pub struct AppCommandTable {
    entries: Vec<ResolvedApp>,
}

impl AppCommandTable {
    /// Resolve every entry against the detected browser
    pub fn resolve(apps: Vec<AppEntry>, browser: &Browser) -> Result<Self> {
        let mut entries: Vec<ResolvedApp> = Vec::with_capacity(apps.len());

        for app in apps {
            if entries.iter().any(|e| e.id == app.id) {
                return Err(Error::Config(format!("duplicate app id '{}'", app.id)));
            }

            let command = match &app.target {
                AppTarget::Web { url } => browser.kiosk_command(url),
                AppTarget::Native { command } => command.clone(),
            };
            if command.trim().is_empty() {
                return Err(Error::Config(format!("app '{}' has an empty command", app.id)));
            }

            entries.push(ResolvedApp {
                id: app.id,
                name: app.name,
                command,
            });
        }

        Ok(Self { entries })
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedApp> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// All ids in table order
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedApp> {
        self.entries.iter()
    }

    /// Listing for the dashboard; every configured app reports available
    pub fn app_infos(&self) -> Vec<AppInfo> {
        self.entries
            .iter()
            .map(|e| AppInfo {
                id: e.id.clone(),
                name: e.name.clone(),
                available: true,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
