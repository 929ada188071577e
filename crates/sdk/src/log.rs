//! Per-endpoint call log
//!
//! Keeps the last few outcomes of each endpoint so a tester page can show
//! recent history next to the send button. In-memory only; history does
//! not survive the process.

use std::collections::HashMap;

use reqnest_common::collections::RecentLog;
use reqnest_domain::constants::CALL_LOG_CAPACITY;
use reqnest_domain::{CallRecord, Endpoint};

/// Bounded newest-first call history, keyed by endpoint.
///
/// Each endpoint's list holds at most [`CALL_LOG_CAPACITY`] records; the
/// oldest is evicted on overflow. Entries only leave early through
/// [`clear`](Self::clear) / [`clear_all`](Self::clear_all).
#[derive(Debug)]
pub struct CallLog {
    entries: HashMap<&'static str, RecentLog<CallRecord>>,
    capacity: usize,
}

impl Default for CallLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CallLog {
    /// Create a log with the standard per-endpoint capacity.
    pub fn new() -> Self {
        Self::with_capacity(CALL_LOG_CAPACITY)
    }

    /// Create a log with a custom per-endpoint capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: HashMap::new(), capacity: capacity.max(1) }
    }

    /// Append a record for `endpoint`, evicting its oldest when full.
    pub fn record(&mut self, endpoint: Endpoint, record: CallRecord) {
        let capacity = self.capacity;
        self.entries
            .entry(endpoint.id())
            .or_insert_with(|| RecentLog::new(capacity))
            .push(record);
    }

    /// Records for `endpoint`, newest first.
    pub fn entries(&self, endpoint: Endpoint) -> impl Iterator<Item = &CallRecord> {
        self.entries.get(endpoint.id()).into_iter().flat_map(RecentLog::iter)
    }

    /// The most recent record for `endpoint`.
    pub fn latest(&self, endpoint: Endpoint) -> Option<&CallRecord> {
        self.entries.get(endpoint.id()).and_then(|log| log.get(0))
    }

    /// Number of records stored for `endpoint`.
    pub fn len(&self, endpoint: Endpoint) -> usize {
        self.entries.get(endpoint.id()).map_or(0, RecentLog::len)
    }

    /// Whether any endpoint has recorded calls.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(RecentLog::is_empty)
    }

    /// Forget the history of one endpoint.
    pub fn clear(&mut self, endpoint: Endpoint) {
        if let Some(log) = self.entries.get_mut(endpoint.id()) {
            log.clear();
        }
    }

    /// Forget all history.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use reqnest_domain::{CallOutcome, HttpResult, RequestInfo};
    use serde_json::Value;

    use super::*;

    fn record_with_status(status: u16) -> CallRecord {
        CallRecord::new(
            RequestInfo {
                method: "GET".to_string(),
                url: "http://localhost/data/orders".to_string(),
                params: BTreeMap::new(),
                body: None,
            },
            CallOutcome::Http(HttpResult {
                status,
                status_text: String::new(),
                headers: BTreeMap::new(),
                data: Value::Null,
            }),
        )
    }

    #[test]
    fn eleventh_record_evicts_the_oldest() {
        let mut log = CallLog::new();
        for n in 1..=11 {
            log.record(Endpoint::List, record_with_status(200 + n));
        }

        assert_eq!(log.len(Endpoint::List), 10);
        // Entry #11 is index 0; entry #1 (status 201) was evicted.
        assert_eq!(log.latest(Endpoint::List).and_then(CallRecord::status), Some(211));
        let statuses: Vec<_> =
            log.entries(Endpoint::List).filter_map(CallRecord::status).collect();
        assert_eq!(statuses.first(), Some(&211));
        assert_eq!(statuses.last(), Some(&202));
    }

    #[test]
    fn endpoints_have_independent_histories() {
        let mut log = CallLog::new();
        log.record(Endpoint::Create, record_with_status(201));
        log.record(Endpoint::List, record_with_status(200));

        assert_eq!(log.len(Endpoint::Create), 1);
        assert_eq!(log.len(Endpoint::List), 1);
        assert_eq!(log.len(Endpoint::Delete), 0);
    }

    #[test]
    fn clear_affects_only_one_endpoint() {
        let mut log = CallLog::new();
        log.record(Endpoint::Create, record_with_status(201));
        log.record(Endpoint::List, record_with_status(200));

        log.clear(Endpoint::Create);
        assert_eq!(log.len(Endpoint::Create), 0);
        assert_eq!(log.len(Endpoint::List), 1);

        log.clear_all();
        assert!(log.is_empty());
    }
}
