use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "tweetcard";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Who is viewing the feed. Decides ownership of tweets.
    pub username: String,
    /// JSON feed to load instead of the built-in demo feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_path: Option<PathBuf>,
    /// Simulated round trip of the local tweet service.
    pub latency_ms: u64,
    pub tick_rate_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub mouse: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: "guest".to_string(),
            feed_path: None,
            latency_ms: 250,
            tick_rate_ms: 250,
            log_file: None,
            mouse: true,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Read the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Write a default config to `path`, creating parent directories.
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(&Self::default())?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config {}", path.display()))
    }

    /// Where logs go: the configured file, else the user cache directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("tweetcard.log")))
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.username, "guest");
        assert!(config.mouse);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "username = \"ada\"\nlatency_ms = 0\nfeed_path = \"/tmp/feed.json\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.username, "ada");
        assert_eq!(config.latency(), Duration::ZERO);
        assert_eq!(config.feed_path, Some(PathBuf::from("/tmp/feed.json")));
        assert_eq!(config.tick_rate_ms, 250);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "username = [").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_write_default_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::write_default(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("username = \"guest\""));
        assert!(!written.contains("feed_path"));
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_log_path_prefers_configured_file() {
        let config = Config {
            log_file: Some(PathBuf::from("/tmp/x.log")),
            ..Config::default()
        };
        assert_eq!(config.log_path(), Some(PathBuf::from("/tmp/x.log")));
    }
}
