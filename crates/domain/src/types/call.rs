//! Call records and the normalized HTTP result shape
//!
//! Every request made through the resource client is summarized as a
//! [`CallRecord`]: what was sent, when, and how it ended. The outcome keeps
//! the deliberate split between "the server answered" (any status code,
//! including 4xx/5xx) and "the transport failed before an answer arrived".
//! Status codes never become errors here; callers render them instead.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized HTTP response, independent of the transport library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResult {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase, empty when unknown.
    pub status_text: String,
    /// Response headers with lowercase names.
    pub headers: BTreeMap<String, String>,
    /// Parsed response body. Non-JSON bodies are kept verbatim as a string.
    pub data: Value,
}

impl HttpResult {
    /// Whether the status is in the 4xx range.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Whether the status is in the 5xx range.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A failure below the HTTP layer: timeout, DNS, connection reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportFailure {
    /// Description of what went wrong.
    pub message: String,
    /// Status and headers captured before the failure, when a response
    /// arrived but reading it failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<HttpResult>,
}

/// How one logical call ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CallOutcome {
    /// The server answered. Any status code, including 4xx/5xx.
    Http(HttpResult),
    /// No usable answer arrived.
    Transport(TransportFailure),
}

/// The request half of a [`CallRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// HTTP method.
    pub method: String,
    /// Full request URL.
    pub url: String,
    /// Query parameters sent with the request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    /// JSON body sent with the request, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// One logged outcome of a single request made through the resource client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// When the call completed.
    pub timestamp: DateTime<Utc>,
    /// What was sent.
    pub request: RequestInfo,
    /// How it ended.
    pub outcome: CallOutcome,
}

impl CallRecord {
    /// Create a record stamped with the current time.
    pub fn new(request: RequestInfo, outcome: CallOutcome) -> Self {
        Self { timestamp: Utc::now(), request, outcome }
    }

    /// HTTP status of the outcome, absent on transport failure.
    pub fn status(&self) -> Option<u16> {
        match &self.outcome {
            CallOutcome::Http(result) => Some(result.status),
            CallOutcome::Transport(_) => None,
        }
    }

    /// Transport error message, absent when the server answered.
    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            CallOutcome::Http(_) => None,
            CallOutcome::Transport(failure) => Some(failure.message.as_str()),
        }
    }
}
