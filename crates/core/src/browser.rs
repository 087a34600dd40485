//! Browser detection
//!
//! Web apps open in a browser running in kiosk mode. The binary is picked
//! once at startup by probing a fixed list of candidate paths; the result
//! is passed into the launch dispatcher as a plain value.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// Candidate browser binaries, in preference order
pub const DEFAULT_BROWSER_CANDIDATES: &[&str] = &[
    "/usr/bin/chromium-browser",
    "/usr/bin/chromium",
    "/snap/bin/chromium",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/google-chrome",
    "/usr/bin/firefox",
];

/// Binary name used when no candidate exists
pub const DEFAULT_BROWSER: &str = "chromium-browser";

/// Browser family, which decides the kiosk flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFamily {
    Chromium,
    Firefox,
}

impl BrowserFamily {
    /// Guess the family from a binary path or name
    pub fn from_binary(binary: &str) -> Self {
        let name = Path::new(binary)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(binary);

        if name.contains("firefox") {
            BrowserFamily::Firefox
        } else {
            BrowserFamily::Chromium
        }
    }
}

/// The selected browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Browser {
    /// Absolute path, or a bare name left for PATH lookup
    pub binary: String,
    pub family: BrowserFamily,
}

impl Browser {
    pub fn new(binary: impl Into<String>) -> Self {
        let binary = binary.into();
        let family = BrowserFamily::from_binary(&binary);
        Self { binary, family }
    }

    /// Shell command opening `url` as a full-screen single-app window
    pub fn kiosk_command(&self, url: &str) -> String {
        let binary = shell_quote(&self.binary);
        let url = shell_quote(url);
        match self.family {
            BrowserFamily::Chromium => format!("{} --app={} --start-fullscreen", binary, url),
            BrowserFamily::Firefox => format!("{} --kiosk {}", binary, url),
        }
    }
}

/// One-time probe for the browser binary
#[derive(Debug, Clone)]
pub struct BrowserProbe {
    candidates: Vec<PathBuf>,
    default: String,
}

impl BrowserProbe {
    pub fn new(candidates: Vec<PathBuf>, default: String) -> Self {
        Self { candidates, default }
    }

    /// Probe the real filesystem, falling back to `which`
    pub fn detect(&self) -> Browser {
        self.detect_with(|path| path.exists(), crate::process::which)
    }

    /// Probe with injected filesystem and PATH lookups
    ///
    /// The first existing candidate wins. If none exist, the default name is
    /// resolved through `which`, and used bare if that fails too.
    pub fn detect_with<E, W>(&self, exists: E, which: W) -> Browser
    where
        E: Fn(&Path) -> bool,
        W: Fn(&str) -> Option<String>,
    {
        for candidate in &self.candidates {
            if exists(candidate) {
                let browser = Browser::new(candidate.to_string_lossy());
                info!(browser = %browser.binary, "Detected browser");
                return browser;
            }
            debug!(candidate = %candidate.display(), "Browser candidate not present");
        }

        if let Some(path) = which(&self.default) {
            info!(browser = %path, "Browser found on PATH");
            return Browser::new(path);
        }

        warn!(
            default = %self.default,
            "No browser candidate found, using default name"
        );
        Browser::new(self.default.clone())
    }
}

impl Default for BrowserProbe {
    fn default() -> Self {
        Self::new(
            DEFAULT_BROWSER_CANDIDATES.iter().map(PathBuf::from).collect(),
            DEFAULT_BROWSER.to_string(),
        )
    }
}

/// Single-quote a word for `sh` unless it is made of safe characters only
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._:-=,@%+~".contains(c));

    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
