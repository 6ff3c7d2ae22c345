//! Browser configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pookie_navigation::DEFAULT_SEARCH_TEMPLATE;
use pookie_session::frame::EMBED_CHECK_DELAY;
use pookie_session::SNAPSHOT_KEY;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Storage slot holding the session snapshot
    pub snapshot_key: String,
    /// Search engine URL template
    pub search_engine: String,
    /// Start with the native webview surface instead of an iframe
    pub use_webview: bool,
    /// How long a loaded page may stay blank before the embed advisory
    pub embed_check_delay_ms: u64,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("pookie.db"),
            snapshot_key: SNAPSHOT_KEY.to_string(),
            search_engine: DEFAULT_SEARCH_TEMPLATE.to_string(),
            use_webview: false,
            embed_check_delay_ms: EMBED_CHECK_DELAY.as_millis() as u64,
        }
    }

    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn embed_check_delay(&self) -> Duration {
        Duration::from_millis(self.embed_check_delay_ms)
    }

    /// Platform data directory for the profile, `.pookie` if there is none.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Pookie"))
            .unwrap_or_else(|| PathBuf::from(".pookie"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/pookie-test"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/pookie-test/pookie.db"));
        assert_eq!(config.snapshot_key, "pookie.tabs.v1");
        assert_eq!(config.embed_check_delay(), Duration::from_millis(600));
        assert!(!config.use_webview);
    }

    #[test]
    fn test_default_lives_in_data_dir() {
        let config = Config::default();
        assert_eq!(config.database_path, Config::data_dir().join("pookie.db"));
        let data_dir = Config::data_dir();
        assert!(data_dir.ends_with("Pookie") || data_dir == PathBuf::from(".pookie"));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "use_webview": true, "embed_check_delay_ms": 50 }"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.use_webview);
        assert_eq!(config.embed_check_delay_ms, 50);
        assert_eq!(config.search_engine, DEFAULT_SEARCH_TEMPLATE);
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(dir.path().join("missing.json")).is_err());

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::from_file(&path).is_err());
    }
}
