//! SDK configuration

pub mod loader;

use std::time::Duration;

use reqnest_domain::constants::DEFAULT_TIMEOUT_SECS;
use reqnest_domain::ReqNestError;
use serde::{Deserialize, Serialize};

/// Configuration for the SDK clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Base URL of the backend (e.g., "https://api.reqnest.io").
    pub base_url: String,
    /// Request timeout in seconds for every call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SdkConfig {
    /// Create a configuration with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout_secs: DEFAULT_TIMEOUT_SECS }
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check that the base URL is present and well-formed.
    ///
    /// A client must refuse to start on a missing base URL instead of
    /// silently building requests against an empty origin.
    ///
    /// # Errors
    /// Returns `ReqNestError::Config` with a descriptive message when the
    /// base URL is empty or unparseable.
    pub fn validate(&self) -> Result<(), ReqNestError> {
        if self.base_url.trim().is_empty() {
            return Err(ReqNestError::Config(
                "backend base URL is not configured; set REQNEST_BASE_URL or a config file"
                    .to_string(),
            ));
        }

        url::Url::parse(&self.base_url).map_err(|err| {
            ReqNestError::Config(format!("invalid backend base URL {:?}: {err}", self.base_url))
        })?;

        Ok(())
    }

    /// Join `path` (which must start with `/`) onto the base URL.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
