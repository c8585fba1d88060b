use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not logged in; run `talkrix login` first")]
    MissingToken,

    #[error("session expired or token rejected")]
    Unauthorized,

    #[error("request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the caller should tear the session down.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::MissingToken)
    }

    /// Builds the error for a non-2xx response from its status and raw body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return Self::Unauthorized;
        }
        Self::from_status(status, body)
    }

    /// Plain status error, for responses to requests sent without the
    /// session token.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            message: error_message(body).unwrap_or_else(|| fallback_message(status, body)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Pulls a readable message out of `{message}` / `{error}` bodies. Validation
/// failures may report `message` as a list of strings.
fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.message {
        Some(serde_json::Value::String(text)) if !text.is_empty() => Some(text),
        Some(serde_json::Value::Array(items)) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => parsed.error.filter(|e| !e.is_empty()),
    }
}

fn fallback_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.chars().take(200).collect()
    }
}
