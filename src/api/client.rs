use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{i18n::LocaleHandle, session::Session};

use super::{
    backend::{ApiRequest, Backend},
    error::{ApiError, ErrorResponse},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-backed [`Backend`]. Every call carries the bearer token and the
/// active locale.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
    locale: LocaleHandle,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        session: Session,
        locale: LocaleHandle,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            locale,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let locale = self.locale.get();
        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(ACCEPT_LANGUAGE, HeaderValue::from_static(locale.as_str()));
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, path = %request.path, "request");
        let response = builder.send().await.map_err(|err| {
            warn!(path = %request.path, error = %err, "request failed");
            ApiError::from(err)
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()));
        }

        match serde_json::from_slice::<ErrorResponse>(&bytes) {
            Ok(mut body) => {
                if body.code == 0 {
                    body.code = i32::from(status.as_u16());
                }
                debug!(code = body.code, reason = %body.reason, "application error");
                Err(ApiError::Application(body))
            }
            Err(_) => {
                warn!(%status, path = %request.path, "error response without a body");
                Err(ApiError::Network(format!("{status} without error body")))
            }
        }
    }
}
