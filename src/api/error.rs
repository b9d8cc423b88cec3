use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error body returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
    #[serde(default)]
    pub reason: String,
}

/// How the console reacts to an application error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// 400: notice that must be dismissed.
    BlockingNotice,
    /// 401: toast, drop the token, go to login.
    SignOut,
    /// 403 and 429.
    Silent,
    /// 405: confirm or cancel before anything else can happen.
    Confirm,
    Toast,
}

impl ErrorResponse {
    pub fn disposition(&self) -> ErrorDisposition {
        match self.code {
            400 => ErrorDisposition::BlockingNotice,
            401 => ErrorDisposition::SignOut,
            403 | 429 => ErrorDisposition::Silent,
            405 => ErrorDisposition::Confirm,
            _ => ErrorDisposition::Toast,
        }
    }

    pub fn has_field_errors(&self) -> bool {
        !self.metadata.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No structured body came back (connection refused, timeout, proxy page).
    #[error("network error: {0}")]
    Network(String),
    #[error("{} ({}): {}", .0.reason, .0.code, .0.message)]
    Application(ErrorResponse),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn response(&self) -> Option<&ErrorResponse> {
        match self {
            ApiError::Application(body) => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_code(code: i32) -> ErrorResponse {
        ErrorResponse {
            code,
            ..ErrorResponse::default()
        }
    }

    #[test]
    fn codes_map_onto_dispositions() {
        assert_eq!(with_code(400).disposition(), ErrorDisposition::BlockingNotice);
        assert_eq!(with_code(401).disposition(), ErrorDisposition::SignOut);
        assert_eq!(with_code(403).disposition(), ErrorDisposition::Silent);
        assert_eq!(with_code(405).disposition(), ErrorDisposition::Confirm);
        assert_eq!(with_code(429).disposition(), ErrorDisposition::Silent);
        assert_eq!(with_code(500).disposition(), ErrorDisposition::Toast);
    }

    #[test]
    fn error_body_tolerates_missing_fields() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"code": 400, "metadata": {"name": "required"}}"#).unwrap();
        assert_eq!(body.metadata.get("name").map(String::as_str), Some("required"));
        assert!(body.reason.is_empty());
    }
}
