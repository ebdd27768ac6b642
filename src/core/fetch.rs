// LogQuery - core/fetch.rs
//
// Per-log-type cache of unfiltered fetch results with request
// de-duplication (stale-while-revalidate).
// Core layer: pure bookkeeping; the app layer performs the requests.
//
// Rules:
//   - At most one fetch per log type is in flight; `revalidate` returns None
//     while one is outstanding.
//   - A response older than the newest applied one for its type is dropped.
//   - A failure keeps previously fetched data and records the error message.
//   - No automatic retry; callers revalidate on demand.

use crate::core::model::{FetchTicket, LogRecord};
use std::collections::HashMap;

/// Cached state for one log type.
#[derive(Debug, Clone, Default)]
struct FetchEntry {
    data: Option<Vec<LogRecord>>,
    error: Option<String>,
    in_flight: Option<u64>,
    last_seq: u64,
    applied_seq: u64,
}

/// Read-only view of one log type's fetch state, as consumed by the
/// render selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchView<'a> {
    pub data: Option<&'a [LogRecord]>,
    pub error: Option<&'a str>,
    pub in_flight: bool,
}

/// Fetch cache keyed by log type.
#[derive(Debug, Clone, Default)]
pub struct FetchCache {
    entries: HashMap<String, FetchEntry>,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a fresh fetch for `log_type`. Returns the ticket to send, or
    /// None when a fetch for that type is already outstanding.
    pub fn revalidate(&mut self, log_type: &str) -> Option<FetchTicket> {
        let entry = self.entries.entry(log_type.to_string()).or_default();
        if entry.in_flight.is_some() {
            return None;
        }
        entry.last_seq += 1;
        entry.in_flight = Some(entry.last_seq);
        Some(FetchTicket {
            log_type: log_type.to_string(),
            seq: entry.last_seq,
        })
    }

    /// Apply a successful response. Returns false when it was discarded as stale.
    pub fn complete(&mut self, ticket: &FetchTicket, records: Vec<LogRecord>) -> bool {
        let Some(entry) = self.accept(ticket) else {
            return false;
        };
        entry.data = Some(records);
        entry.error = None;
        true
    }

    /// Apply a failed response. Returns false when it was discarded as stale.
    pub fn fail(&mut self, ticket: &FetchTicket, message: impl Into<String>) -> bool {
        let Some(entry) = self.accept(ticket) else {
            return false;
        };
        entry.error = Some(message.into());
        true
    }

    fn accept(&mut self, ticket: &FetchTicket) -> Option<&mut FetchEntry> {
        let entry = self.entries.get_mut(&ticket.log_type)?;
        if entry.in_flight == Some(ticket.seq) {
            entry.in_flight = None;
        }
        if ticket.seq <= entry.applied_seq {
            return None;
        }
        entry.applied_seq = ticket.seq;
        Some(entry)
    }

    /// Current state for `log_type`. Unknown types look like "nothing yet".
    pub fn view(&self, log_type: &str) -> FetchView<'_> {
        match self.entries.get(log_type) {
            Some(entry) => FetchView {
                data: entry.data.as_deref(),
                error: entry.error.as_deref(),
                in_flight: entry.in_flight.is_some(),
            },
            None => FetchView::default(),
        }
    }

    /// Records available for `log_type`, if a fetch has succeeded.
    pub fn records(&self, log_type: &str) -> Option<&[LogRecord]> {
        self.view(log_type).data
    }

    /// Whether any fetch is outstanding.
    pub fn any_in_flight(&self) -> bool {
        self.entries.values().any(|e| e.in_flight.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> LogRecord {
        serde_json::from_value(serde_json::json!({ "_id": id })).unwrap()
    }

    #[test]
    fn test_unknown_type_is_empty_view() {
        let cache = FetchCache::new();
        let view = cache.view("error");
        assert!(view.data.is_none());
        assert!(view.error.is_none());
        assert!(!view.in_flight);
    }

    #[test]
    fn test_revalidate_deduplicates_in_flight() {
        let mut cache = FetchCache::new();
        let first = cache.revalidate("error").unwrap();
        assert!(cache.revalidate("error").is_none());
        assert!(cache.view("error").in_flight);

        // A different type is independent.
        assert!(cache.revalidate("info").is_some());

        assert!(cache.complete(&first, vec![record("a")]));
        assert!(!cache.view("error").in_flight);
        assert_eq!(cache.records("error").map(<[_]>::len), Some(1));
        assert!(cache.revalidate("error").is_some());
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut cache = FetchCache::new();
        let t1 = cache.revalidate("error").unwrap();
        assert!(cache.fail(&t1, "connection refused"));
        assert_eq!(cache.view("error").error, Some("connection refused"));

        let t2 = cache.revalidate("error").unwrap();
        assert!(cache.complete(&t2, vec![]));
        assert!(cache.view("error").error.is_none());
        assert_eq!(cache.records("error"), Some(&[][..]));
    }

    #[test]
    fn test_failure_keeps_stale_data() {
        let mut cache = FetchCache::new();
        let t1 = cache.revalidate("error").unwrap();
        cache.complete(&t1, vec![record("a"), record("b")]);

        let t2 = cache.revalidate("error").unwrap();
        assert!(cache.fail(&t2, "timed out"));
        let view = cache.view("error");
        assert_eq!(view.data.map(<[_]>::len), Some(2));
        assert_eq!(view.error, Some("timed out"));
    }

    #[test]
    fn test_older_response_is_discarded() {
        let mut cache = FetchCache::new();
        let old = FetchTicket {
            log_type: "error".to_string(),
            seq: 1,
        };
        let t1 = cache.revalidate("error").unwrap();
        assert_eq!(t1, old);
        cache.complete(&t1, vec![record("new")]);

        // Replayed delivery of an already-applied sequence number.
        assert!(!cache.complete(&old, vec![record("old")]));
        assert_eq!(cache.records("error").unwrap()[0].id, "new");
    }

    #[test]
    fn test_response_for_unrequested_type_is_discarded() {
        let mut cache = FetchCache::new();
        let ticket = FetchTicket {
            log_type: "warning".to_string(),
            seq: 1,
        };
        assert!(!cache.complete(&ticket, vec![record("a")]));
        assert!(cache.records("warning").is_none());
    }

    #[test]
    fn test_any_in_flight() {
        let mut cache = FetchCache::new();
        assert!(!cache.any_in_flight());
        let t = cache.revalidate("error").unwrap();
        assert!(cache.any_in_flight());
        cache.fail(&t, "boom");
        assert!(!cache.any_in_flight());
    }
}
