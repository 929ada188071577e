//! Sample payload generation
//!
//! A tester page starts from a payload the user can edit. The typed
//! defaults below are the always-available floor; the backend's generation
//! service produces something more realistic when it is reachable, and the
//! fall back to the defaults is unconditional.

use std::sync::Arc;

use reqnest_domain::constants::GENERATE_SAMPLE_PATH;
use reqnest_domain::{ReqNestError, SchemaDocument};
use reqwest::header::COOKIE;
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::SdkConfig;
use crate::http::HttpClient;
use crate::session::{active_session, SessionStore};

/// Derive a zero-value payload from a schema's declared property types.
///
/// One key per schema property: string→`""`, number→`0`, boolean→`false`,
/// array→`[]`, object→`{}`. Any other declared type (including
/// `"integer"`, which the platform never emits on its own) falls through
/// to `null`.
pub fn default_sample(schema: &SchemaDocument) -> Value {
    let mut sample = Map::new();
    for (name, property) in &schema.properties {
        sample.insert(name.clone(), zero_value(property.property_type.as_deref()));
    }
    Value::Object(sample)
}

fn zero_value(property_type: Option<&str>) -> Value {
    match property_type {
        Some("string") => json!(""),
        Some("number") => json!(0),
        Some("boolean") => json!(false),
        Some("array") => json!([]),
        Some("object") => json!({}),
        _ => Value::Null,
    }
}

/// Asks the backend generation service for realistic sample payloads.
pub struct SampleGenerator {
    http: Arc<HttpClient>,
    config: SdkConfig,
    session: Arc<dyn SessionStore>,
}

impl SampleGenerator {
    /// Create a new sample generator.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(
        config: SdkConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, ReqNestError> {
        config.validate()?;

        let http = HttpClient::builder().timeout(config.timeout()).build()?;

        Ok(Self { http: Arc::new(http), config, session })
    }

    /// Create a generator sharing an existing HTTP client.
    pub fn with_http_client(
        http: Arc<HttpClient>,
        config: SdkConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, ReqNestError> {
        config.validate()?;
        Ok(Self { http, config, session })
    }

    /// Fetch a realistic sample for `schema`, falling back to
    /// [`default_sample`] on any failure of the generation service.
    ///
    /// This never returns an error: a broken or slow generation service
    /// degrades the starting payload, it does not break the page.
    pub async fn remote_sample(&self, schema: &SchemaDocument) -> Value {
        match self.request_sample(schema).await {
            Ok(sample) => sample,
            Err(err) => {
                debug!(error = %err, "sample generation unavailable, using typed defaults");
                default_sample(schema)
            }
        }
    }

    async fn request_sample(&self, schema: &SchemaDocument) -> Result<Value, ReqNestError> {
        let url = self.config.endpoint_url(GENERATE_SAMPLE_PATH);

        let mut request = self.http.request(Method::POST, &url).json(schema);
        if let Some(session) = active_session(self.session.as_ref()).await? {
            request = request.header(COOKIE, session.cookie);
        }

        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReqNestError::Internal(format!(
                "sample generation returned status {status}"
            )));
        }

        response.json().await.map_err(|err| {
            ReqNestError::Internal(format!("sample generation returned invalid JSON: {err}"))
        })
    }
}
