//! Resource-client error types

use reqnest_domain::{ReqNestError, TransportFailure};
use thiserror::Error;

/// Errors surfaced by the resource client.
///
/// Only [`ClientError::Transport`] means a request actually went out and
/// died on the wire; every other variant is caught before the network and
/// is reported inline rather than logged as a call outcome.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request body is not valid JSON: {0}")]
    InvalidBodyJson(String),

    #[error("Request headers are not valid JSON: {0}")]
    InvalidHeaderJson(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Transport failure: {}", .0.message)]
    Transport(TransportFailure),
}

impl ClientError {
    /// Build a transport error with no partial response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(TransportFailure { message: message.into(), partial: None })
    }

    /// Whether this error was caught before any request was sent.
    pub fn is_preflight(&self) -> bool {
        !matches!(self, Self::Transport(_))
    }
}

impl From<ReqNestError> for ClientError {
    fn from(err: ReqNestError) -> Self {
        match err {
            ReqNestError::Network(message) => Self::transport(message),
            ReqNestError::Auth(message) => Self::Session(message),
            ReqNestError::Config(message) => Self::Config(message),
            other => Self::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_not_preflight() {
        assert!(!ClientError::transport("connection reset").is_preflight());
        assert!(ClientError::Config("no base url".to_string()).is_preflight());
        assert!(ClientError::InvalidBodyJson("eof".to_string()).is_preflight());
    }

    #[test]
    fn network_errors_convert_to_transport() {
        let err: ClientError = ReqNestError::Network("dns failure".to_string()).into();
        match err {
            ClientError::Transport(failure) => {
                assert_eq!(failure.message, "dns failure");
                assert!(failure.partial.is_none());
            }
            other => panic!("expected transport, got {:?}", other),
        }
    }

    #[test]
    fn body_and_header_errors_render_distinctly() {
        let body = ClientError::InvalidBodyJson("eof".to_string()).to_string();
        let headers = ClientError::InvalidHeaderJson("eof".to_string()).to_string();
        assert!(body.contains("body"));
        assert!(headers.contains("headers"));
        assert_ne!(body, headers);
    }
}
