//! Configuration management for the HealthSync client.
//!
//! Loads configuration from ${HEALTHSYNC_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for HealthSync configuration and credential storage.
    //!
    //! HEALTHSYNC_HOME resolution order:
    //! 1. HEALTHSYNC_HOME environment variable (if set)
    //! 2. ~/.config/healthsync (default)

    use std::path::PathBuf;

    /// Returns the HealthSync home directory.
    ///
    /// Checks HEALTHSYNC_HOME env var first, falls back to ~/.config/healthsync
    pub fn healthsync_home() -> PathBuf {
        if let Ok(home) = std::env::var("HEALTHSYNC_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("healthsync"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        healthsync_home().join("config.toml")
    }

    /// Returns the path to the persisted credential file.
    pub fn credentials_path() -> PathBuf {
        healthsync_home().join("credentials.json")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the HealthSync backend
    pub server_url: String,

    /// Timeout for API requests in seconds (0 disables)
    pub request_timeout_secs: u32,

    /// Timeout for the startup identity-verification call in seconds.
    ///
    /// Kept separate from the general request timeout so a hung backend
    /// cannot indefinitely block the first authentication decision.
    pub verify_timeout_secs: u32,
}

impl Config {
    const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;
    const DEFAULT_VERIFY_TIMEOUT_SECS: u32 = 10;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Saves only the server_url field to the config file.
    ///
    /// Creates the file if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_server_url(server_url: &str) -> Result<()> {
        Self::save_server_url_to(&paths::config_path(), server_url)
    }

    /// Saves only the server_url field to a specific config file path.
    pub fn save_server_url_to(path: &Path, server_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        url::Url::parse(server_url)
            .with_context(|| format!("Invalid server URL: {server_url}"))?;

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["server_url"] = value(server_url.trim_end_matches('/'));

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Returns the server base URL without a trailing slash.
    pub fn server_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Timeout for the bootstrap verification call. Always bounded: falls back
    /// to the default when configured as 0 so the gate can never hang forever.
    pub fn verify_timeout(&self) -> Duration {
        let secs = if self.verify_timeout_secs == 0 {
            Self::DEFAULT_VERIFY_TIMEOUT_SECS
        } else {
            self.verify_timeout_secs
        };
        Duration::from_secs(u64::from(secs))
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: Self::DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            verify_timeout_secs: Self::DEFAULT_VERIFY_TIMEOUT_SECS,
        }
    }
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    /// Config loading: missing file returns defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.server_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, 30);
    }

    /// Config loading: partial config merges with defaults.
    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "server_url = \"https://portal.example.com\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.server_url, "https://portal.example.com");
        assert_eq!(config.verify_timeout_secs, 10);
    }

    /// Config init: creates file with defaults, creates parent dirs.
    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("server_url ="));
        assert!(contents.contains("# request_timeout_secs ="));
    }

    /// Config init: fails if file exists (no silent overwrite).
    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let result = Config::init(&config_path);
        assert!(result.is_err());
    }

    /// save_server_url: preserves other fields, strips trailing slash.
    #[test]
    fn test_save_server_url_preserves_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "request_timeout_secs = 5\n").unwrap();

        Config::save_server_url_to(&config_path, "https://portal.example.com/").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.server_url, "https://portal.example.com");
        assert_eq!(config.request_timeout_secs, 5);
    }

    /// save_server_url: rejects strings that are not URLs.
    #[test]
    fn test_save_server_url_rejects_invalid() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        assert!(Config::save_server_url_to(&config_path, "not a url").is_err());
        assert!(!config_path.exists());
    }

    /// Verification timeout is always bounded, even when configured as 0.
    #[test]
    fn test_verify_timeout_never_zero() {
        let config = Config {
            verify_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.verify_timeout(), Duration::from_secs(10));
    }
}
