//! Command handlers.

use anyhow::Result;

use healthsync_core::config::Config;
use healthsync_core::credentials::CredentialStore;
use healthsync_core::session::SessionManager;

pub mod analyze;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod reports;
pub mod wearable;

/// Builds a session against the configured backend.
pub(crate) fn session(config: &Config) -> Result<SessionManager> {
    SessionManager::new(config, CredentialStore::open_default())
}

/// The gate every protected command passes through: resolve the stored
/// credential first, then refuse to proceed unless it verified. The
/// decision waits for bootstrap, however long verification takes.
pub(crate) async fn authenticated_session(config: &Config) -> Result<SessionManager> {
    let mut session = session(config)?;
    session.bootstrap().await?;
    if !session.is_authenticated() {
        anyhow::bail!("Not logged in. Run `healthsync login <email>` first.");
    }
    Ok(session)
}
