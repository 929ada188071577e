//! Rate-limit exhaustion signal
//!
//! Exhaustion is a side channel, not an error: the backend answers normally
//! and sets `X-RateLimit-Remaining: 0`. The same extraction applies to
//! schema fetches, successful resource calls, and partial responses captured
//! on transport failure, so callers can block further sends and show a reset
//! countdown no matter which path the headers arrived on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER,
};
use crate::types::HttpResult;

/// Quota state extracted from rate-limit headers when the quota is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    /// Total quota for the window, when the backend reported it.
    pub limit: Option<u64>,
    /// Remaining calls. Always zero for an exhaustion signal.
    pub remaining: u64,
    /// Unix-seconds timestamp when the window resets, when parseable.
    pub reset: Option<i64>,
}

impl RateLimitStatus {
    /// Extract the exhaustion signal from response headers.
    ///
    /// Returns `Some` only when `X-RateLimit-Remaining` is present and zero;
    /// a response with quota left carries no signal. Header names are
    /// matched case-insensitively since proxies rewrite casing freely.
    pub fn from_headers(headers: &BTreeMap<String, String>) -> Option<Self> {
        let lookup = |name: &str| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.trim())
        };

        let remaining = lookup(RATE_LIMIT_REMAINING_HEADER)?.parse::<u64>().ok()?;
        if remaining != 0 {
            return None;
        }

        Some(Self {
            limit: lookup(RATE_LIMIT_LIMIT_HEADER).and_then(|v| v.parse().ok()),
            remaining,
            reset: lookup(RATE_LIMIT_RESET_HEADER).and_then(|v| v.parse().ok()),
        })
    }

    /// Extract the exhaustion signal from a normalized response.
    pub fn from_result(result: &HttpResult) -> Option<Self> {
        Self::from_headers(&result.headers)
    }
}

impl crate::types::CallRecord {
    /// Rate-limit exhaustion carried by this call's outcome, whichever path
    /// produced it: a full response, or the partial response captured when
    /// the transport failed mid-read.
    pub fn rate_limit(&self) -> Option<RateLimitStatus> {
        match &self.outcome {
            crate::types::CallOutcome::Http(result) => RateLimitStatus::from_result(result),
            crate::types::CallOutcome::Transport(failure) => {
                failure.partial.as_ref().and_then(RateLimitStatus::from_result)
            }
        }
    }
}
