//! Typed client for the HealthSync backend API.
//!
//! Two surfaces: free functions for the unauthenticated identity
//! endpoints (`login`, `register`, `health`), and [`ApiClient`] for
//! everything behind the bearer credential. `ApiClient` attaches the
//! current token to each call and never self-manages refresh, retry,
//! or expiry; a 401 comes back as [`ApiError::Unauthorized`] for the
//! session manager to intercept.

use std::time::Duration;

use reqwest::multipart;
use serde::de::DeserializeOwned;

pub mod error;
pub mod types;

pub use error::ApiError;
use types::{
    AnalysisRequest, AnalysisResponse, Dashboard, DocumentList, HealthStatus, LoginRequest,
    RegisterRequest, ReportReceipt, TokenResponse, UploadReceipt, User, WearableAuth,
    WearableSeries,
};

/// Standard User-Agent header for HealthSync API requests.
pub const USER_AGENT: &str = concat!("healthsync/", env!("CARGO_PKG_VERSION"));

/// Exchanges credentials for a bearer token and the subject identity.
pub async fn login(
    http: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> Result<TokenResponse, ApiError> {
    let response = http
        .post(format!("{base_url}/api/login"))
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .json(&LoginRequest { email, password })
        .send()
        .await?;

    decode(check_with(response, "Login failed").await?).await
}

/// Creates a new account. Does not authenticate the caller.
pub async fn register(
    http: &reqwest::Client,
    base_url: &str,
    profile: &RegisterRequest,
) -> Result<User, ApiError> {
    let response = http
        .post(format!("{base_url}/api/register"))
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .json(profile)
        .send()
        .await?;

    decode(check_with(response, "Registration failed").await?).await
}

/// Unauthenticated backend health probe.
pub async fn health(http: &reqwest::Client, base_url: &str) -> Result<HealthStatus, ApiError> {
    let response = http
        .get(format!("{base_url}/api/health"))
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await?;

    decode(check(response).await?).await
}

/// Bearer-authenticated view of the API, bound to one token value.
///
/// Cheap to construct; the session manager hands one out per operation
/// so the token can never go stale inside a held client.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{path}", self.base_url))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .bearer_auth(&self.token)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{path}", self.base_url))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .bearer_auth(&self.token)
    }

    /// Fetches the identity behind the current token.
    pub async fn me(&self) -> Result<User, ApiError> {
        let response = self.get("/api/me").send().await?;
        decode(check(response).await?).await
    }

    /// Identity verification with an explicit deadline, used by
    /// `bootstrap()` so a hung backend cannot block the first
    /// authentication decision.
    pub async fn me_with_timeout(&self, timeout: Duration) -> Result<User, ApiError> {
        let response = self.get("/api/me").timeout(timeout).send().await?;
        decode(check(response).await?).await
    }

    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        let response = self.get("/api/dashboard").send().await?;
        decode(check(response).await?).await
    }

    pub async fn list_documents(&self) -> Result<DocumentList, ApiError> {
        let response = self.get("/api/documents").send().await?;
        decode(check(response).await?).await
    }

    /// Uploads a document as a multipart `file` part. The backend reads
    /// `patient_id` and `document_type` from the query string.
    pub async fn upload_document(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
        patient_id: Option<&str>,
        document_type: &str,
    ) -> Result<UploadReceipt, ApiError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(ApiError::Transport)?;
        let form = multipart::Form::new().part("file", part);

        let mut request = self
            .post("/api/documents/upload")
            .query(&[("document_type", document_type)]);
        if let Some(patient_id) = patient_id {
            request = request.query(&[("patient_id", patient_id)]);
        }

        let response = request.multipart(form).send().await?;
        decode(check(response).await?).await
    }

    pub async fn download_document(&self, document_id: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .get(&format!("/api/documents/{document_id}/download"))
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, ApiError> {
        let response = self.post("/api/analyze").json(request).send().await?;
        decode(check(response).await?).await
    }

    /// Fetches the external authorization URL for a wearable provider
    /// (`google` or `fitbit`). The browser flow itself is out of scope.
    pub async fn wearable_auth_url(&self, provider: &str) -> Result<WearableAuth, ApiError> {
        let response = self
            .get(&format!("/api/wearable/{provider}/auth"))
            .send()
            .await?;
        decode(check(response).await?).await
    }

    pub async fn wearable_data(
        &self,
        data_type: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<WearableSeries, ApiError> {
        let response = self
            .get("/api/wearable/data")
            .query(&[
                ("data_type", data_type),
                ("start_date", start_date),
                ("end_date", end_date),
            ])
            .send()
            .await?;
        decode(check(response).await?).await
    }

    /// The backend reads `report_type` from the query string.
    pub async fn generate_report(&self, report_type: &str) -> Result<ReportReceipt, ApiError> {
        let response = self
            .post("/api/reports/generate")
            .query(&[("report_type", report_type)])
            .send()
            .await?;
        decode(check(response).await?).await
    }

    pub async fn download_report(&self, report_id: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .get(&format!("/api/reports/{report_id}/download"))
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Maps a non-2xx response to an error with a status-based fallback reason.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let fallback = format!("Request failed (HTTP {})", response.status().as_u16());
    Err(error::from_response(response, &fallback).await)
}

/// Maps a non-2xx response to an error with an operation-specific fallback.
async fn check_with(
    response: reqwest::Response,
    fallback: &str,
) -> Result<reqwest::Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(error::from_response(response, fallback).await)
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    Ok(response.json::<T>().await?)
}
