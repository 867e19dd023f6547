use serde::Deserialize;
use std::path::PathBuf;

// =============================================================================
// Network-related constants
// =============================================================================

/// User-Agent sent with every provider and download request
pub const USER_AGENT: &str = "release-radar";

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Maximum number of redirects followed by a single request
pub const MAX_REDIRECTS: usize = 10;

/// Delay between starting each provider fetch to avoid rate limiting (10ms)
pub const FETCH_STAGGER_DELAY_MS: u64 = 10;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default check interval
pub const DEFAULT_INTERVAL: &str = "3h";

/// Length of one scheduler tick in milliseconds (20 ticks per second)
pub const TICK_MILLIS: u64 = 50;

/// Longest accepted check interval in ticks (100 years)
pub const MAX_INTERVAL_TICKS: u64 = 100 * 365 * 24 * 60 * 60 * 1_000 / TICK_MILLIS;

/// Updater configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdaterConfig {
    /// Global toggle; when false no provider is ever contacted
    pub enabled: bool,
    /// Download the winning release artifact into the download directory
    pub attempt_downloads: bool,
    /// Check interval in the `<number><unit>` grammar (e.g. "3h", "1d 12h")
    pub interval: String,
    /// Accept alpha/beta/rc/snapshot releases as updates
    pub unstable: bool,
    /// Permission an audience member needs to receive notifications
    pub permission: Option<String>,
    /// Directory downloaded artifacts are written to
    pub download_dir: Option<PathBuf>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            attempt_downloads: true,
            interval: DEFAULT_INTERVAL.to_string(),
            unstable: false,
            permission: None,
            download_dir: None,
        }
    }
}

impl UpdaterConfig {
    /// Directory downloads go to, falling back to [`download_dir`]
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(download_dir)
    }
}

/// Returns the path to the data directory for release-radar.
/// Uses $XDG_DATA_HOME/release-radar if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-radar,
/// or ./release-radar if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the default directory downloaded artifacts are stored in.
pub fn download_dir() -> PathBuf {
    data_dir().join("updates")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("release-radar.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("release-radar")
}
