//! Bounded, newest-first store of debug records.
//!
//! The store knows nothing about rendering: each record carries an opaque
//! handle from the view layer, and every record that leaves the store
//! (removed, overwritten, evicted or cleared) is handed back to the caller so
//! the view can unmount it.

use std::collections::VecDeque;

use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_MAX_MESSAGES: usize = 50;

/// One logged event.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageRecord<H> {
    pub id: String,
    pub endpoint: String,
    pub payload: Value,
    pub timestamp: String,
    /// Owned by the view; only forwarded back for removal.
    pub handle: H,
}

/// Snapshot row used by the JSON export.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportedRecord {
    pub id: String,
    pub endpoint: String,
    pub payload: Value,
    pub timestamp: String,
}

impl<H> From<&MessageRecord<H>> for ExportedRecord {
    fn from(record: &MessageRecord<H>) -> Self {
        Self {
            id: record.id.clone(),
            endpoint: record.endpoint.clone(),
            payload: record.payload.clone(),
            timestamp: record.timestamp.clone(),
        }
    }
}

/// Hands out `debug-<n>` ids. The counter only ever grows.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> String {
        self.counter += 1;
        format!("debug-{}", self.counter)
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.counter
    }
}

#[derive(Debug)]
pub struct Ledger<H> {
    // front = newest
    records: VecDeque<MessageRecord<H>>,
    max_messages: usize,
}

impl<H> Ledger<H> {
    pub fn new(max_messages: usize) -> Self {
        let max_messages = max_messages.max(1);
        Self {
            records: VecDeque::with_capacity(max_messages + 1),
            max_messages,
        }
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// Insert at the newest position. Returns every record displaced by the
    /// insert: the previous holder of the same id (if any) followed by the
    /// evicted oldest record (if the cap was exceeded).
    pub fn insert(&mut self, record: MessageRecord<H>) -> Vec<MessageRecord<H>> {
        let mut displaced = Vec::new();
        if let Some(previous) = self.remove(&record.id) {
            displaced.push(previous);
        }
        self.records.push_front(record);
        if self.records.len() > self.max_messages {
            if let Some(oldest) = self.records.pop_back() {
                displaced.push(oldest);
            }
        }
        displaced
    }

    /// Remove by id. Missing ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<MessageRecord<H>> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        self.records.remove(pos)
    }

    /// Drop everything, newest first.
    pub fn clear(&mut self) -> Vec<MessageRecord<H>> {
        self.records.drain(..).collect()
    }

    pub fn get(&self, id: &str) -> Option<&MessageRecord<H>> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in display order (newest first).
    pub fn iter(&self) -> impl Iterator<Item = &MessageRecord<H>> {
        self.records.iter()
    }

    pub fn export(&self) -> Vec<ExportedRecord> {
        self.records.iter().map(ExportedRecord::from).collect()
    }
}

impl<H> Default for Ledger<H> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(id: &str, endpoint: &str, payload: Value) -> MessageRecord<u32> {
        MessageRecord {
            id: id.to_string(),
            endpoint: endpoint.to_string(),
            payload,
            timestamp: "12:00:00.000".to_string(),
            handle: 0,
        }
    }

    fn ids(ledger: &Ledger<u32>) -> Vec<String> {
        ledger.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut generator = IdGenerator::new();
        assert_eq!(generator.next(), "debug-1");
        assert_eq!(generator.next(), "debug-2");
        assert_eq!(generator.issued(), 2);
    }

    #[test]
    fn test_newest_first_order() {
        let mut ledger = Ledger::new(10);
        ledger.insert(rec("a", "/a", json!(1)));
        ledger.insert(rec("b", "/b", json!(2)));
        ledger.insert(rec("c", "/c", json!(3)));
        assert_eq!(ids(&ledger), ["c", "b", "a"]);
        let exported: Vec<_> = ledger.export().into_iter().map(|r| r.endpoint).collect();
        assert_eq!(exported, ["/c", "/b", "/a"]);
    }

    #[test]
    fn test_evicts_single_oldest() {
        let mut ledger = Ledger::new(2);
        assert!(ledger.insert(rec("a", "/a", json!(1))).is_empty());
        assert!(ledger.insert(rec("b", "/b", json!(2))).is_empty());
        let displaced = ledger.insert(rec("c", "/c", json!(3)));
        assert_eq!(displaced.len(), 1);
        assert_eq!(displaced[0].id, "a");
        assert_eq!(ledger.len(), 2);
        assert_eq!(ids(&ledger), ["c", "b"]);
    }

    #[test]
    fn test_bound_holds_for_long_sequences() {
        let mut ledger = Ledger::new(5);
        for i in 0..40 {
            ledger.insert(rec(&format!("m{i}"), "/x", json!(i)));
            assert!(ledger.len() <= 5);
        }
        assert_eq!(ids(&ledger), ["m39", "m38", "m37", "m36", "m35"]);
    }

    #[test]
    fn test_colliding_id_overwrites() {
        let mut ledger = Ledger::new(10);
        ledger.insert(rec("form-x", "/first", json!({"v": 1})));
        ledger.insert(rec("other", "/o", json!(null)));
        let displaced = ledger.insert(rec("form-x", "/second", json!({"v": 2})));

        assert_eq!(displaced.len(), 1);
        assert_eq!(displaced[0].endpoint, "/first");
        assert_eq!(ledger.len(), 2);
        assert_eq!(ids(&ledger), ["form-x", "other"]);
        assert_eq!(ledger.get("form-x").map(|r| r.payload.clone()), Some(json!({"v": 2})));
    }

    #[test]
    fn test_overwrite_at_cap_does_not_evict() {
        let mut ledger = Ledger::new(2);
        ledger.insert(rec("a", "/a", json!(1)));
        ledger.insert(rec("b", "/b", json!(2)));
        let displaced = ledger.insert(rec("a", "/a2", json!(3)));
        assert_eq!(displaced.len(), 1);
        assert_eq!(ids(&ledger), ["a", "b"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut ledger = Ledger::new(10);
        ledger.insert(rec("a", "/a", json!(1)));
        ledger.insert(rec("b", "/b", json!(2)));
        assert!(ledger.remove("a").is_some());
        assert!(!ledger.contains("a"));
        assert!(ledger.contains("b"));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.remove("a").is_none());
        assert_eq!(ledger.len(), 1);
        assert!(ledger.remove("missing").is_none());
    }

    #[test]
    fn test_clear_empty_and_full() {
        let mut ledger: Ledger<u32> = Ledger::default();
        assert!(ledger.clear().is_empty());
        assert_eq!(ledger.len(), 0);

        ledger.insert(rec("a", "/a", json!(1)));
        ledger.insert(rec("b", "/b", json!(2)));
        let cleared = ledger.clear();
        assert_eq!(cleared.len(), 2);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_zero_cap_is_clamped() {
        let mut ledger = Ledger::new(0);
        assert_eq!(ledger.max_messages(), 1);
        ledger.insert(rec("a", "/a", json!(1)));
        ledger.insert(rec("b", "/b", json!(2)));
        assert_eq!(ids(&ledger), ["b"]);
    }

    #[test]
    fn test_export_is_a_snapshot() {
        let mut ledger = Ledger::new(10);
        ledger.insert(rec("a", "/a", json!({"x": 1})));
        let snapshot = ledger.export();
        ledger.clear();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].payload, json!({"x": 1}));
    }
}
