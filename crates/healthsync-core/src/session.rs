//! Session lifecycle: the single source of truth for "is the current
//! user allowed to reach protected screens".
//!
//! [`SessionManager`] is the sole writer of the persisted credential.
//! Feature code never holds a token directly; it runs operations
//! through [`SessionManager::authorized`], which binds the current
//! token to an [`ApiClient`] and centrally intercepts 401s.
//!
//! Every network call is best-effort with no automatic retry. Ambiguous
//! failures on the verification path are treated as "not authenticated"
//! (fail closed), never as "assume the old session still holds".

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::api::types::{RegisterRequest, User};
use crate::api::{self, ApiClient, ApiError};
use crate::config::Config;
use crate::credentials::CredentialStore;

/// Where the session is in its lifecycle.
///
/// Gating must not branch on this directly; it reads the derived
/// [`SessionManager::is_authenticated`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No credential, or the user explicitly logged out.
    Unauthenticated,
    /// A persisted credential is being verified against the backend.
    Validating,
    /// Identity and credential present, last verification succeeded.
    Authenticated,
    /// A credential was present but the backend rejected it (or the
    /// verification failed); the credential has been discarded.
    Expired,
}

pub struct SessionManager {
    http: reqwest::Client,
    base_url: String,
    verify_timeout: Duration,
    store: CredentialStore,
    token: Option<String>,
    identity: Option<User>,
    status: SessionStatus,
    bootstrapped: bool,
}

impl SessionManager {
    /// Creates a session manager for the configured backend, reading
    /// and writing the given credential store.
    pub fn new(config: &Config, store: CredentialStore) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.server_url().to_string(),
            verify_timeout: config.verify_timeout(),
            store,
            token: None,
            identity: None,
            status: SessionStatus::Unauthenticated,
            bootstrapped: false,
        })
    }

    /// Resolves the persisted credential into a session, once per process.
    ///
    /// No credential: no network call, status stays Unauthenticated.
    /// Credential present: status Validating while `GET /api/me` runs
    /// under the verification timeout; success populates the identity,
    /// any failure (transport, 401, malformed body, unreadable store)
    /// discards the credential and leaves the session Expired.
    ///
    /// Subsequent calls are no-ops, so callers may gate on it freely.
    pub async fn bootstrap(&mut self) -> Result<()> {
        if self.bootstrapped {
            return Ok(());
        }
        self.bootstrapped = true;

        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.status = SessionStatus::Unauthenticated;
                return Ok(());
            }
            Err(err) => {
                warn!("discarding unreadable credential store: {err:#}");
                self.store.clear()?;
                self.status = SessionStatus::Expired;
                return Ok(());
            }
        };

        self.status = SessionStatus::Validating;
        let client = ApiClient::new(self.http.clone(), &self.base_url, &token);
        match client.me_with_timeout(self.verify_timeout).await {
            Ok(user) => {
                debug!(user_id = %user.id, "stored credential verified");
                self.token = Some(token);
                self.identity = Some(user);
                self.status = SessionStatus::Authenticated;
            }
            Err(err) => {
                debug!("identity verification failed, failing closed: {err}");
                self.store.clear()?;
                self.token = None;
                self.identity = None;
                self.status = SessionStatus::Expired;
            }
        }

        Ok(())
    }

    /// Exchanges credentials for a session. On success the token is
    /// persisted and the session becomes Authenticated. On failure the
    /// existing session state and persisted credential are untouched;
    /// the error carries the server's reason (`detail`) when present.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ApiError> {
        let granted = api::login(&self.http, &self.base_url, email, password).await?;

        self.store
            .save(&granted.access_token)
            .map_err(|err| ApiError::Store(format!("{err:#}")))?;

        self.token = Some(granted.access_token);
        self.identity = Some(granted.user.clone());
        self.status = SessionStatus::Authenticated;
        Ok(granted.user)
    }

    /// Creates an account. Never authenticates the caller; a successful
    /// registration must be followed by an explicit `login`.
    pub async fn register(&self, profile: &RegisterRequest) -> Result<User, ApiError> {
        api::register(&self.http, &self.base_url, profile).await
    }

    /// Clears the identity and token and deletes the persisted
    /// credential. Idempotent and safe to call from any status.
    pub fn logout(&mut self) -> Result<()> {
        self.discard(SessionStatus::Unauthenticated);
        self.store.clear().context("delete persisted credential")?;
        Ok(())
    }

    /// Derived authentication flag: true iff an identity is present.
    /// Route gating reads only this, never the raw status.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_user(&self) -> Option<&User> {
        self.identity.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Unauthenticated backend health probe.
    pub async fn health(&self) -> Result<api::types::HealthStatus, ApiError> {
        api::health(&self.http, &self.base_url).await
    }

    /// Runs an operation with an [`ApiClient`] bound to the current
    /// token. A 401 from the operation expires the session (credential
    /// discarded) before the error surfaces, so no screen can keep
    /// silently failing against a stale token.
    pub async fn authorized<T, F, Fut>(&mut self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(ApiClient) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let Some(token) = self.token.as_deref() else {
            return Err(ApiError::Unauthorized {
                reason: "Not logged in".to_string(),
            });
        };

        let client = ApiClient::new(self.http.clone(), &self.base_url, token);
        match op(client).await {
            Err(err) if err.is_unauthorized() => {
                warn!("credential rejected mid-session, logging out: {err}");
                self.discard(SessionStatus::Expired);
                if let Err(clear_err) = self.store.clear() {
                    warn!("failed to delete persisted credential: {clear_err:#}");
                }
                Err(err)
            }
            other => other,
        }
    }

    fn discard(&mut self, status: SessionStatus) {
        self.identity = None;
        self.token = None;
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn manager(dir: &std::path::Path) -> SessionManager {
        let store = CredentialStore::at(dir.join("credentials.json"));
        SessionManager::new(&Config::default(), store).unwrap()
    }

    /// A fresh session is unauthenticated with no token.
    #[test]
    fn test_fresh_session_is_unauthenticated() {
        let dir = tempdir().unwrap();
        let session = manager(dir.path());

        assert!(!session.is_authenticated());
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert_eq!(session.token(), None);
    }

    /// Logout from a fresh session is a no-op, twice in a row.
    #[test]
    fn test_logout_idempotent_without_credential() {
        let dir = tempdir().unwrap();
        let mut session = manager(dir.path());

        session.logout().unwrap();
        session.logout().unwrap();
        assert!(!session.is_authenticated());
    }

    /// `authorized` refuses to run without a token and does not panic.
    #[tokio::test]
    async fn test_authorized_without_token_is_unauthorized() {
        let dir = tempdir().unwrap();
        let mut session = manager(dir.path());

        let result = session.authorized(|client| async move { client.me().await }).await;
        assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    }
}
