//! Path utilities: expand `~`, resolve the default data directory.

use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// `$HOME/.local/share/tempus`, or `./tempus` when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".local").join("share").join("tempus"))
        .unwrap_or_else(|| PathBuf::from("tempus"))
}
