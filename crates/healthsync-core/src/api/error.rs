//! Request failure taxonomy.
//!
//! Four categories: transport failure (no usable response), 401s, any
//! other server rejection, and credential-store failures. The session
//! manager folds transport and 401 into fail-closed logout on the
//! verification path; elsewhere the reason surfaces to the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Network/transport failure: connect, timeout, or unreadable body.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 401: the bearer credential was rejected. Intercepted centrally
    /// so the session manager can log out before the error surfaces.
    #[error("{reason}")]
    Unauthorized { reason: String },

    /// Any other non-2xx response, with the server's `detail` message
    /// when present.
    #[error("{reason}")]
    Rejected { status: u16, reason: String },

    /// The persisted credential could not be read or written.
    #[error("credential store: {0}")]
    Store(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Converts a non-2xx response into an [`ApiError`].
///
/// Pulls the human-readable reason out of the backend's `{detail: ...}`
/// error body, using `fallback` when the body lacks one.
pub(crate) async fn from_response(response: reqwest::Response, fallback: &str) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let reason = extract_detail(&body).unwrap_or_else(|| fallback.to_string());

    if status == reqwest::StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized { reason }
    } else {
        ApiError::Rejected {
            status: status.as_u16(),
            reason,
        }
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(std::string::ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: `detail` messages are extracted verbatim.
    #[test]
    fn test_extract_detail_present() {
        assert_eq!(
            extract_detail(r#"{"detail":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
    }

    /// Test: malformed or detail-less bodies yield nothing.
    #[test]
    fn test_extract_detail_absent() {
        assert_eq!(extract_detail("not json"), None);
        assert_eq!(extract_detail(r#"{"error":"boom"}"#), None);
        assert_eq!(extract_detail(r#"{"detail":42}"#), None);
    }

    /// Test: display of a rejection is the bare reason, suitable for users.
    #[test]
    fn test_display_is_reason() {
        let err = ApiError::Rejected {
            status: 400,
            reason: "Email already registered".to_string(),
        };
        assert_eq!(err.to_string(), "Email already registered");
    }
}
