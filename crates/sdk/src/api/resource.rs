//! The resource client
//!
//! Maps the five generated operations onto their fixed REST routes. Two
//! rules here are deliberate and easy to get wrong:
//!
//! - Any HTTP status is a successful transport outcome. The backend's 4xx
//!   and 5xx bodies are diagnostic payload, not errors, so nothing on this
//!   path calls `error_for_status`.
//! - No retries. A failed call is reported once; resubmitting is the
//!   caller's decision.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqnest_domain::constants::DEFAULT_MATCH_FIELD;
use reqnest_domain::{
    CallOutcome, CallRecord, Endpoint, HttpResult, ReqNestError, RequestInfo, TransportFailure,
};
use reqwest::header::{HeaderMap, ACCEPT, COOKIE, SET_COOKIE};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SdkConfig;
use crate::http::client::{collect_headers, transport_message};
use crate::http::HttpClient;
use crate::session::{active_session, MemorySessionStore, Session, SessionStore};

use super::errors::ClientError;

/// One call against a generated resource endpoint.
#[derive(Debug, Clone, Copy)]
pub enum ResourceCall<'a> {
    /// `POST /data/{resource}`
    Create { resource: &'a str, body: &'a Value },
    /// `GET /data/{resource}`
    List { resource: &'a str },
    /// `POST /data/{resource}/search`
    Search { resource: &'a str, criteria: &'a Value },
    /// `PUT /data/{resource}?updateAll={bool}&field={match_field}`
    Update { resource: &'a str, data: &'a Value, update_all: bool, match_field: &'a str },
    /// `DELETE /data/{resource}/delete` with the criteria as the body
    Delete { resource: &'a str, criteria: &'a Value },
}

impl<'a> ResourceCall<'a> {
    /// The endpoint this call targets.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Create { .. } => Endpoint::Create,
            Self::List { .. } => Endpoint::List,
            Self::Search { .. } => Endpoint::Search,
            Self::Update { .. } => Endpoint::Update,
            Self::Delete { .. } => Endpoint::Delete,
        }
    }

    fn resource(&self) -> &'a str {
        match *self {
            Self::Create { resource, .. }
            | Self::List { resource }
            | Self::Search { resource, .. }
            | Self::Update { resource, .. }
            | Self::Delete { resource, .. } => resource,
        }
    }

    /// Outgoing body and query parameters for this call.
    ///
    /// For updates without `update_all`, the match field is removed from
    /// the body: the matching value travels only in the query, so the body
    /// carries exactly the fields to apply.
    fn payload(&self) -> (Option<Value>, BTreeMap<String, String>) {
        match *self {
            Self::Create { body, .. } => (Some(body.clone()), BTreeMap::new()),
            Self::List { .. } => (None, BTreeMap::new()),
            Self::Search { criteria, .. } => (Some(criteria.clone()), BTreeMap::new()),
            Self::Update { data, update_all, match_field, .. } => {
                let mut body = data.clone();
                if !update_all {
                    if let Value::Object(fields) = &mut body {
                        fields.remove(match_field);
                    }
                }

                let mut params = BTreeMap::new();
                params.insert("updateAll".to_string(), update_all.to_string());
                params.insert("field".to_string(), match_field.to_string());
                (Some(body), params)
            }
            Self::Delete { criteria, .. } => (Some(criteria.clone()), BTreeMap::new()),
        }
    }
}

/// Client for the five generated CRUD endpoints of uploaded schemas.
pub struct ResourceClient {
    http: Arc<HttpClient>,
    config: SdkConfig,
    session: Arc<dyn SessionStore>,
}

impl ResourceClient {
    /// Create a new resource client.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(
        config: SdkConfig,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, ClientError> {
        config.validate()?;

        let http = HttpClient::builder().timeout(config.timeout()).build()?;

        Ok(Self { http: Arc::new(http), config, session })
    }

    /// Create a builder for fluent configuration.
    pub fn builder() -> ResourceClientBuilder {
        ResourceClientBuilder::default()
    }

    /// Create a record: `POST /data/{resource}`.
    pub async fn create(
        &self,
        resource: &str,
        body: &Value,
    ) -> Result<HttpResult, ClientError> {
        self.send(ResourceCall::Create { resource, body }).await
    }

    /// List all records: `GET /data/{resource}`.
    pub async fn list(&self, resource: &str) -> Result<HttpResult, ClientError> {
        self.send(ResourceCall::List { resource }).await
    }

    /// Search records by criteria: `POST /data/{resource}/search`.
    pub async fn search(
        &self,
        resource: &str,
        criteria: &Value,
    ) -> Result<HttpResult, ClientError> {
        self.send(ResourceCall::Search { resource, criteria }).await
    }

    /// Update records: `PUT /data/{resource}`.
    ///
    /// `match_field` names the property identifying the target records and
    /// travels as a query parameter. When `update_all` is false it is also
    /// stripped from the outgoing body.
    pub async fn update(
        &self,
        resource: &str,
        data: &Value,
        update_all: bool,
        match_field: &str,
    ) -> Result<HttpResult, ClientError> {
        self.send(ResourceCall::Update { resource, data, update_all, match_field }).await
    }

    /// [`update`](Self::update) matching on the default `"id"` field.
    pub async fn update_by_id(
        &self,
        resource: &str,
        data: &Value,
    ) -> Result<HttpResult, ClientError> {
        self.update(resource, data, false, DEFAULT_MATCH_FIELD).await
    }

    /// Delete records by criteria: `DELETE /data/{resource}/delete`.
    ///
    /// The criteria ride in the request body, not in query parameters.
    pub async fn delete(
        &self,
        resource: &str,
        criteria: &Value,
    ) -> Result<HttpResult, ClientError> {
        self.send(ResourceCall::Delete { resource, criteria }).await
    }

    async fn send(&self, call: ResourceCall<'_>) -> Result<HttpResult, ClientError> {
        let record = self.dispatch(call).await?;
        match record.outcome {
            CallOutcome::Http(result) => Ok(result),
            CallOutcome::Transport(failure) => Err(ClientError::Transport(failure)),
        }
    }

    /// Perform one call and normalize it into a [`CallRecord`].
    ///
    /// `Err` is reserved for problems detected before the request went out
    /// (configuration, session store). Both server answers, whatever their
    /// status, and transport failures come back inside the record, ready to
    /// append to a call log. The client itself appends nothing.
    pub async fn dispatch(&self, call: ResourceCall<'_>) -> Result<CallRecord, ClientError> {
        self.dispatch_with_headers(call, &BTreeMap::new()).await
    }

    /// [`dispatch`](Self::dispatch) with extra request headers, typically
    /// parsed from user input via
    /// [`parse_header_text`](super::input::parse_header_text).
    pub async fn dispatch_with_headers(
        &self,
        call: ResourceCall<'_>,
        extra_headers: &BTreeMap<String, String>,
    ) -> Result<CallRecord, ClientError> {
        let endpoint = call.endpoint();
        let (body, params) = call.payload();
        let url = self.config.endpoint_url(&endpoint.path_for(call.resource()));
        let method = endpoint_method(endpoint);

        debug!(endpoint = endpoint.id(), %url, "dispatching resource call");

        let mut request = self.http.request(method.clone(), &url);

        if !params.is_empty() {
            let pairs: Vec<(&str, &str)> =
                params.iter().map(|(key, value)| (key.as_str(), value.as_str())).collect();
            request = request.query(&pairs);
        }

        request = match &body {
            Some(json) => request.json(json),
            None => request.header(ACCEPT, "application/json"),
        };

        for (name, value) in extra_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let session = active_session(self.session.as_ref())
            .await
            .map_err(|err| ClientError::Session(err.to_string()))?;
        if let Some(session) = session {
            request = request.header(COOKIE, session.cookie);
        }

        let request_info =
            RequestInfo { method: method.to_string(), url, params, body };

        let outcome = match self.http.send(request).await {
            Ok(response) => self.read_response(response).await,
            Err(ReqNestError::Network(message)) => {
                CallOutcome::Transport(TransportFailure { message, partial: None })
            }
            Err(other) => return Err(other.into()),
        };

        let record = CallRecord::new(request_info, outcome);

        if let Some(limit) = record.rate_limit() {
            warn!(
                endpoint = endpoint.id(),
                limit = ?limit.limit,
                reset = ?limit.reset,
                "rate limit exhausted"
            );
        }
        info!(endpoint = endpoint.id(), status = ?record.status(), "resource call completed");

        Ok(record)
    }

    /// Read a response into an outcome, keeping status and headers when the
    /// body read fails mid-flight.
    async fn read_response(&self, response: reqwest::Response) -> CallOutcome {
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers = collect_headers(response.headers());

        self.capture_session(response.headers()).await;

        match response.text().await {
            Ok(text) => CallOutcome::Http(HttpResult {
                status: status.as_u16(),
                status_text,
                headers,
                data: parse_loose_json(&text),
            }),
            Err(err) => CallOutcome::Transport(TransportFailure {
                message: transport_message(&err),
                partial: Some(HttpResult {
                    status: status.as_u16(),
                    status_text,
                    headers,
                    data: Value::Null,
                }),
            }),
        }
    }

    /// Persist a refreshed session cookie from `Set-Cookie`, best effort.
    async fn capture_session(&self, headers: &HeaderMap) {
        let pairs: Vec<String> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .map(|pair| pair.trim().to_string())
            .filter(|pair| !pair.is_empty())
            .collect();

        if pairs.is_empty() {
            return;
        }

        let session = Session::new(pairs.join("; "));
        if let Err(err) = self.session.save(&session).await {
            warn!(error = %err, "failed to persist refreshed session");
        }
    }
}

/// Builder for [`ResourceClient`].
#[derive(Default)]
pub struct ResourceClientBuilder {
    config: Option<SdkConfig>,
    session: Option<Arc<dyn SessionStore>>,
    http: Option<Arc<HttpClient>>,
}

impl ResourceClientBuilder {
    /// Set the SDK configuration.
    pub fn config(mut self, config: SdkConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the session store.
    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Reuse an existing HTTP client instead of building one.
    pub fn http_client(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the resource client.
    ///
    /// # Errors
    ///
    /// Returns error if no configuration was provided, the configuration is
    /// invalid, or client creation fails.
    pub fn build(self) -> Result<ResourceClient, ClientError> {
        let config = self
            .config
            .ok_or_else(|| ClientError::Config("Configuration not set".to_string()))?;
        config.validate()?;

        let session: Arc<dyn SessionStore> =
            self.session.unwrap_or_else(|| Arc::new(MemorySessionStore::new()));

        let http = match self.http {
            Some(http) => http,
            None => Arc::new(HttpClient::builder().timeout(config.timeout()).build()?),
        };

        Ok(ResourceClient { http, config, session })
    }
}

fn endpoint_method(endpoint: Endpoint) -> Method {
    match endpoint {
        Endpoint::Create | Endpoint::Search => Method::POST,
        Endpoint::List => Method::GET,
        Endpoint::Update => Method::PUT,
        Endpoint::Delete => Method::DELETE,
    }
}

/// Parse a body as JSON, keeping non-JSON text verbatim for display.
fn parse_loose_json(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
