//! Config path resolution
//!
//! Follows the XDG Base Directory Specification with an env var override.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PROGRESS_HUD_CONFIG` | HUD config file | `~/.config/progress-hud/hud.toml` |

use std::path::PathBuf;

use tracing::info;

const APP_DIR: &str = "progress-hud";

/// Get the XDG config directory for progress-hud
///
/// Priority: `XDG_CONFIG_HOME` > `~/.config`
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config").join(APP_DIR);
    }

    // Last resort: current directory
    PathBuf::from(".")
}

/// Get the HUD config path
///
/// Priority: `PROGRESS_HUD_CONFIG` env var > `config_dir()/hud.toml`
pub fn config_path() -> PathBuf {
    std::env::var("PROGRESS_HUD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config_dir().join("hud.toml"))
}

/// Log resolved paths for discoverability
pub fn log_paths() {
    info!("config directory: {}", config_dir().display());
    info!("hud config: {}", config_path().display());
}
