//! Records mirrored from the Talkrix backend.
//!
//! These types carry no invariants of their own: each one holds whatever the
//! server last returned. Unknown fields are ignored and missing optional
//! fields default, so older and newer backends deserialize alike.

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthUser {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(alias = "dashboardTourCompleted", alias = "hasCompletedTour")]
    pub tour_completed: bool,
    pub is_first_login: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(alias = "access_token", alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub user: AuthUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Agent {
    #[serde(alias = "_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub system_prompt: String,
    pub voice: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub temperature: Option<f32>,
    pub selected_tools: Vec<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Tool {
    #[serde(alias = "_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_url: Option<String>,
    pub http_method: Option<String>,
    pub parameters: Vec<ToolParameter>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolParameter {
    pub name: String,
    pub location: String,
    pub schema_type: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Campaign {
    #[serde(alias = "_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub agent_id: Option<String>,
    pub from_number: Option<String>,
    pub contact_count: u64,
    pub scheduled_at: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignStats {
    pub total_contacts: u64,
    pub called: u64,
    pub completed: u64,
    pub failed: u64,
    pub pending: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(alias = "_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactUploadResult {
    pub imported: u64,
    pub skipped: u64,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    Completed,
    InProgress,
    Failed,
    NoAnswer,
    Busy,
    #[serde(other)]
    Unknown,
}

impl CallStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in_progress",
            Self::Failed => "failed",
            Self::NoAnswer => "no_answer",
            Self::Busy => "busy",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    Inbound,
    Outbound,
    Web,
    #[serde(other)]
    Unknown,
}

impl CallType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
            Self::Web => "web",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    #[serde(alias = "_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub agent_name: String,
    #[serde(default)]
    pub from_number: String,
    #[serde(default)]
    pub to_number: String,
    pub status: CallStatus,
    #[serde(rename = "type", alias = "callType")]
    pub call_type: CallType,
    #[serde(default)]
    pub duration_seconds: u64,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CallPage {
    pub calls: Vec<CallRecord>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CallStats {
    pub total_calls: u64,
    pub completed_calls: u64,
    pub failed_calls: u64,
    pub average_duration_seconds: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatsPeriod {
    #[default]
    Today,
    Week,
    Month,
}

impl StatsPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Today => Self::Week,
            Self::Week => Self::Month,
            Self::Month => Self::Today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_calls: u64,
    pub total_minutes: f64,
    pub active_agents: u64,
    pub active_campaigns: u64,
    pub success_rate: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Corpus {
    #[serde(alias = "_id", alias = "corpusId", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub document_count: u64,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CorpusSource {
    #[serde(alias = "_id", alias = "sourceId", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub kind: Option<String>,
    pub start_urls: Vec<String>,
    pub max_documents: Option<u64>,
    pub document_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CorpusDocument {
    #[serde(alias = "_id", alias = "documentId", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub file_name: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<u64>,
    pub source_id: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub presigned_url: String,
    pub document_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryChunk {
    pub content: String,
    pub score: f64,
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub company_name: Option<String>,
    pub timezone: Option<String>,
    pub default_agent_id: Option<String>,
    pub max_concurrent_calls: Option<u32>,
    pub max_call_duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TelephonySettings {
    pub provider: Option<String>,
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub phone_numbers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiKey {
    #[serde(alias = "apiKey")]
    pub key: String,
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn auth_response_accepts_snake_case_token() {
        let body = r#"{"access_token":"abc","user":{"name":"Ada","email":"ada@example.com","dashboardTourCompleted":true}}"#;
        let parsed: AuthResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.access_token, "abc");
        assert!(parsed.user.tour_completed);
        assert!(!parsed.user.is_first_login);
    }

    #[test]
    fn unknown_call_status_does_not_fail_the_page() {
        let body = r#"{"calls":[{"id":"c1","status":"queued","type":"outbound"}],"total":1}"#;
        let page: CallPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.calls[0].status, CallStatus::Unknown);
        assert_eq!(page.calls[0].call_type, CallType::Outbound);
        assert_eq!(page.total, 1);
    }
}
