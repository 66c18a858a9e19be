//! Wire types for the HealthSync backend API.
//!
//! Field names match the backend's JSON exactly; everything here is
//! pass-through data the client renders but does not interpret.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role. Determines which profile attributes are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Clinician,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Clinician => write!(f, "clinician"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "clinician" => Ok(Role::Clinician),
            other => anyhow::bail!("Unknown role '{other}' (expected patient or clinician)"),
        }
    }
}

/// The authenticated subject as returned by `/api/me` and `/api/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Body for `POST /api/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response of `POST /api/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub user: User,
}

/// Body for `POST /api/register`.
///
/// Clinician accounts require `license_number` and `specialty`; patient
/// accounts may carry `date_of_birth` and `phone`. The backend enforces
/// the role-specific rules.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Response of `GET /api/dashboard`.
#[derive(Debug, Clone, Deserialize)]
pub struct Dashboard {
    pub user: User,
    pub stats: DashboardStats,
    #[serde(default)]
    pub recent_documents: Vec<RecentDocument>,
    #[serde(default)]
    pub recent_analyses: Vec<RecentAnalysis>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardStats {
    pub total_documents: u64,
    pub total_analyses: u64,
    pub wearable_connected: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentAnalysis {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response of `GET /api/documents`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    pub documents: Vec<DocumentInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInfo {
    pub document_id: String,
    pub filename: String,
    pub file_size: u64,
    pub document_type: String,
    pub uploaded_at: String,
    pub processing_status: String,
}

/// Response of `POST /api/documents/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub document_id: String,
    pub filename: String,
    pub file_size: u64,
    pub content_type: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub document_type: String,
    pub upload_status: String,
}

/// Body for `POST /api/analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_ids: Option<Vec<String>>,
    pub analysis_type: String,
}

/// Response of `POST /api/analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    pub analysis_id: String,
    pub query: String,
    pub response: String,
    pub confidence_score: f64,
    #[serde(default)]
    pub sources: Vec<String>,
    pub timestamp: String,
}

/// Response of `GET /api/wearable/{provider}/auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct WearableAuth {
    pub auth_url: String,
}

/// Response of `GET /api/wearable/data`.
#[derive(Debug, Clone, Deserialize)]
pub struct WearableSeries {
    pub data_type: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub data: Vec<WearablePoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WearablePoint {
    pub date: String,
    pub value: f64,
}

/// Response of `POST /api/reports/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportReceipt {
    pub report_id: String,
    pub user_id: String,
    pub report_type: String,
    #[serde(default)]
    pub date_range: BTreeMap<String, String>,
    pub generated_at: String,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    #[serde(default)]
    pub services: BTreeMap<String, String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: role round-trips through serde with the backend's spelling.
    #[test]
    fn test_role_serde_spelling() {
        assert_eq!(serde_json::to_string(&Role::Clinician).unwrap(), "\"clinician\"");
        let role: Role = serde_json::from_str("\"patient\"").unwrap();
        assert_eq!(role, Role::Patient);
    }

    /// Test: role parsing from CLI input.
    #[test]
    fn test_role_from_str() {
        assert_eq!("Patient".parse::<Role>().unwrap(), Role::Patient);
        assert_eq!(" clinician ".parse::<Role>().unwrap(), Role::Clinician);
        assert!("admin".parse::<Role>().is_err());
    }

    /// Test: register body omits absent optional attributes.
    #[test]
    fn test_register_request_omits_none_fields() {
        let request = RegisterRequest {
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
            full_name: "A B".to_string(),
            role: Role::Patient,
            license_number: None,
            specialty: None,
            date_of_birth: Some("1990-01-01".to_string()),
            phone: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("license_number").is_none());
        assert!(json.get("phone").is_none());
        assert_eq!(json["date_of_birth"], "1990-01-01");
    }

    /// Test: user body without optional clinician fields still parses.
    #[test]
    fn test_user_minimal_body() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","email":"a@b.com","full_name":"A B","role":"patient","is_active":true}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.license_number, None);
    }
}
