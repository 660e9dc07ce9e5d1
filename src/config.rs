use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

// =============================================================================
// Marker file constants
// =============================================================================

/// File name of the version marker searched for in a directory and its ancestors
pub const MARKER_FILE_NAME: &str = ".semver";

/// Default template used to render and parse version tags (e.g. `v1.4.2`, `v2.0.0-beta.1`)
pub const TAG_FORMAT: &str = "v%M.%m.%p%s";

/// Environment variable holding the log filter directive for the CLI
pub const LOG_ENV: &str = "SEMVER_MARKER_LOG";

const APP_NAME: &str = "semver-marker";

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Template used by the `tag` command
    pub tag_format: String,
    /// Whether `parse` lets the input omit trailing numeric components
    pub allow_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_format: TAG_FORMAT.to_string(),
            allow_missing: true,
        }
    }
}

impl Config {
    /// Load the configuration file if present.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file is logged and
    /// also yields the defaults.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Failed to read config {:?}: {}", path, e);
                return Self::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring malformed config {:?}: {}", path, e);
            Self::default()
        })
    }
}

/// Returns the path to the config file.
/// Uses $XDG_CONFIG_HOME/semver-marker/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/semver-marker/config.json.
pub fn config_path() -> PathBuf {
    app_dir_with_env(
        std::env::var("XDG_CONFIG_HOME").ok(),
        dirs::home_dir(),
        ".config",
    )
    .join("config.json")
}

/// Returns the path to the data directory for semver-marker.
/// Uses $XDG_DATA_HOME/semver-marker if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/semver-marker,
/// or ./semver-marker if neither is available.
pub fn data_dir() -> PathBuf {
    app_dir_with_env(
        std::env::var("XDG_DATA_HOME").ok(),
        dirs::home_dir(),
        ".local/share",
    )
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("semver-marker.log")
}

fn app_dir_with_env(
    xdg_home: Option<String>,
    home_dir: Option<PathBuf>,
    home_relative: &str,
) -> PathBuf {
    let base_dir = xdg_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(home_relative)))
        .unwrap_or_else(|| PathBuf::from("."));

    base_dir.join(APP_NAME)
}
