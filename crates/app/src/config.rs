//! Engine configuration read from the environment

use std::path::PathBuf;

/// Where the engine keeps its files and which services it talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding `storage.json`
    pub data_dir: PathBuf,
    /// Directory downloads are written to
    pub download_dir: PathBuf,
    /// WebSocket URL of the color suggestion service; None disables suggestions
    pub suggest_url: Option<String>,
}

impl AppConfig {
    /// Parse from `DOODLE_DATA_DIR`, `DOODLE_DOWNLOAD_DIR` and `DOODLE_SUGGEST_URL`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty("DOODLE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let download_dir = non_empty("DOODLE_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_download_dir);
        let suggest_url = non_empty("DOODLE_SUGGEST_URL");

        Self {
            data_dir,
            download_dir,
            suggest_url,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("doodle-pad")
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
