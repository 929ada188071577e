//! Schema fetching with envelope unwrapping
//!
//! `GET /apis/{name}` answers with an envelope whose `schemaJson` field is
//! sometimes an object, sometimes a JSON-encoded string, and sometimes
//! wrapped a second time under another `schemaJson` key. The loader
//! tolerates all three shapes and turns everything else into one of three
//! distinguishable page-level failures: redirected to authentication, body
//! not JSON, schema absent.

use std::sync::Arc;

use reqnest_domain::constants::SCHEMA_PATH_PREFIX;
use reqnest_domain::{
    HttpResult, RateLimitStatus, ReqNestError, SchemaDocument, TransportFailure,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::SdkConfig;
use crate::http::client::{collect_headers, transport_message};
use crate::http::HttpClient;
use crate::session::{active_session, SessionStore};

/// Schema-fetch errors, distinct from per-call errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not signed in: the schema request was redirected to authentication")]
    AuthRedirect,

    #[error("Schema response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Schema response contains no schema document")]
    Missing,

    #[error("Transport failure: {}", .0.message)]
    Transport(TransportFailure),
}

impl From<ReqNestError> for SchemaError {
    fn from(err: ReqNestError) -> Self {
        match err {
            ReqNestError::Network(message) => {
                Self::Transport(TransportFailure { message, partial: None })
            }
            ReqNestError::Config(message) => Self::Config(message),
            other => Self::Config(other.to_string()),
        }
    }
}

/// Fetches schema documents for named resources.
pub struct SchemaLoader {
    http: Arc<HttpClient>,
    config: SdkConfig,
    session: Arc<dyn SessionStore>,
}

impl SchemaLoader {
    /// Create a new schema loader.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(
        config: SdkConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, SchemaError> {
        config.validate()?;

        let http = HttpClient::builder().timeout(config.timeout()).build()?;

        Ok(Self { http: Arc::new(http), config, session })
    }

    /// Create a loader sharing an existing HTTP client.
    pub fn with_http_client(
        http: Arc<HttpClient>,
        config: SdkConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, SchemaError> {
        config.validate()?;
        Ok(Self { http, config, session })
    }

    /// Fetch the schema for `resource`.
    pub async fn load(&self, resource: &str) -> Result<SchemaDocument, SchemaError> {
        let path = format!("{}/{}", SCHEMA_PATH_PREFIX, urlencoding::encode(resource));
        let url = self.config.endpoint_url(&path);
        debug!(%url, "fetching schema");

        let mut request =
            self.http.request(Method::GET, &url).header(ACCEPT, "application/json");

        if let Some(session) = active_session(self.session.as_ref()).await? {
            request = request.header(COOKIE, session.cookie);
        }

        let response = self.http.send(request).await.map_err(SchemaError::from)?;

        let status = response.status();
        let final_path = response.url().path().to_string();
        let headers = collect_headers(response.headers());
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if let Some(limit) = RateLimitStatus::from_headers(&headers) {
            warn!(resource, limit = ?limit.limit, reset = ?limit.reset, "rate limit exhausted");
        }

        // A session that lapsed mid-browse answers with 401/403, or follows
        // a redirect to the sign-in page and serves HTML with a 200.
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SchemaError::AuthRedirect);
        }
        if !final_path.ends_with(&path) {
            return Err(SchemaError::AuthRedirect);
        }

        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                return Err(SchemaError::Transport(TransportFailure {
                    message: transport_message(&err),
                    partial: Some(HttpResult {
                        status: status.as_u16(),
                        status_text,
                        headers,
                        data: Value::Null,
                    }),
                }))
            }
        };

        if content_type.starts_with("text/html") || text.trim_start().starts_with('<') {
            return Err(SchemaError::AuthRedirect);
        }

        let envelope: Value = serde_json::from_str(&text)
            .map_err(|err| SchemaError::InvalidJson(err.to_string()))?;

        let schema_value = unwrap_schema_json(&envelope)?;

        serde_json::from_value(schema_value)
            .map_err(|err| SchemaError::InvalidJson(err.to_string()))
    }
}

/// Unwrap the `schemaJson` envelope.
///
/// The field may hold the document directly, hold it as a JSON-encoded
/// string, or wrap it one extra time under another `schemaJson` key (in
/// either encoding). Deeper nesting is not chased.
fn unwrap_schema_json(envelope: &Value) -> Result<Value, SchemaError> {
    let outer = envelope.get("schemaJson").ok_or(SchemaError::Missing)?;
    let outer = decode_level(outer)?;

    match outer.get("schemaJson") {
        Some(nested) => decode_level(nested),
        None => Ok(outer),
    }
}

fn decode_level(value: &Value) -> Result<Value, SchemaError> {
    match value {
        Value::String(text) => serde_json::from_str(text)
            .map_err(|err| SchemaError::InvalidJson(err.to_string())),
        other => Ok(other.clone()),
    }
}
