//! Bearer credential storage and retrieval.
//!
//! Persists the session token in `<base>/credentials.json` with restricted
//! permissions (0600). The token is never logged or displayed in full.
//! The session manager is the only writer; everything else reads the
//! token value through it.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// On-disk shape of the persisted credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    /// Bearer token issued by POST /api/login.
    token: String,
    /// When the token was stored, for `healthsync whoami` display only.
    /// The backend is the sole authority on validity.
    saved_at: chrono::DateTime<chrono::Utc>,
}

/// File-backed store for the single bearer credential.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Opens the store at the default location under HEALTHSYNC_HOME.
    pub fn open_default() -> Self {
        Self::at(paths::credentials_path())
    }

    /// Opens the store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Loads the persisted token, if any.
    ///
    /// Returns `None` if the file doesn't exist.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credentials from {}", self.path.display()))?;

        let stored: StoredCredential = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse credentials from {}", self.path.display()))?;

        Ok(Some(stored.token))
    }

    /// Saves the token to disk with restricted permissions (0600).
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let stored = StoredCredential {
            token: token.to_string(),
            saved_at: chrono::Utc::now(),
        };
        let contents =
            serde_json::to_string_pretty(&stored).context("Failed to serialize credentials")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Deletes the persisted credential. Returns whether one existed.
    ///
    /// Idempotent: a missing file is not an error.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to delete {}", self.path.display()))?;
        Ok(true)
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    /// Test: save/load/clear roundtrip through the filesystem.
    #[test]
    fn test_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("credentials.json"));

        assert_eq!(store.load().unwrap(), None);

        store.save("tok-abc").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok-abc"));

        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    /// Test: clear is idempotent.
    #[test]
    fn test_clear_idempotent() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("credentials.json"));

        assert!(!store.clear().unwrap());
        store.save("tok").unwrap();
        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
    }

    /// Test: save creates missing parent directories.
    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("nested").join("credentials.json"));

        store.save("tok").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok"));
    }

    /// Test: corrupt file surfaces a parse error rather than a token.
    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let store = CredentialStore::at(path);
        assert!(store.load().is_err());
    }

    /// Test: token masking.
    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJhbGciOiJI...");
        assert_eq!(mask_token("short"), "***");
    }

    /// Test: credential file is written with owner-only permissions.
    #[cfg(unix)]
    #[test]
    fn test_file_mode_is_0600() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = CredentialStore::at(dir.path().join("credentials.json"));
        store.save("tok").unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
