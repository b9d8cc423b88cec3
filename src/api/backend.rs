use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// One round trip to the backend. Success yields the payload; every failure
/// is already classified.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}
