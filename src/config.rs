//! Runtime settings, read once from the environment at startup.
//!
//! There is no configuration file. Every setting has a default; a malformed
//! override is logged and ignored rather than aborting startup.
//!
//!   SCREENSHOT_SERVICE_HOTKEY            accelerator, default "F12"
//!   SCREENSHOT_SERVICE_DIR               default <documents>/ScreenshotService
//!   SCREENSHOT_SERVICE_CAPTURE_DELAY_MS  default 250, at most 5000

use std::path::PathBuf;
use std::time::Duration;

pub const HOTKEY_VAR: &str = "SCREENSHOT_SERVICE_HOTKEY";
pub const DIR_VAR: &str = "SCREENSHOT_SERVICE_DIR";
pub const CAPTURE_DELAY_VAR: &str = "SCREENSHOT_SERVICE_CAPTURE_DELAY_MS";

pub const DEFAULT_HOTKEY: &str = "F12";

/// Time between moving the controller window off-screen and grabbing the
/// display. A best-effort wait for the window manager to repaint, not a
/// synchronization point.
pub const DEFAULT_CAPTURE_DELAY: Duration = Duration::from_millis(250);
pub const MAX_CAPTURE_DELAY: Duration = Duration::from_millis(5000);

const SCREENSHOTS_DIR_NAME: &str = "ScreenshotService";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub hotkey: String,
    pub screenshots_dir: PathBuf,
    pub capture_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotkey: DEFAULT_HOTKEY.to_string(),
            screenshots_dir: default_screenshots_dir(),
            capture_delay: DEFAULT_CAPTURE_DELAY,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(hotkey) = non_empty(lookup(HOTKEY_VAR)) {
            settings.hotkey = hotkey;
        }

        if let Some(dir) = non_empty(lookup(DIR_VAR)) {
            settings.screenshots_dir = PathBuf::from(dir);
        }

        if let Some(raw) = non_empty(lookup(CAPTURE_DELAY_VAR)) {
            match parse_delay(&raw) {
                Some(delay) => settings.capture_delay = delay,
                None => log::warn!(
                    "Ignoring {}={:?}: expected milliseconds between 0 and {}",
                    CAPTURE_DELAY_VAR,
                    raw,
                    MAX_CAPTURE_DELAY.as_millis()
                ),
            }
        }

        settings
    }
}

/// `<documents>/ScreenshotService`, falling back to `<home>/Documents`.
pub fn default_screenshots_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SCREENSHOTS_DIR_NAME)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_delay(raw: &str) -> Option<Duration> {
    let millis: u64 = raw.parse().ok()?;
    let delay = Duration::from_millis(millis);
    (delay <= MAX_CAPTURE_DELAY).then_some(delay)
}
