//! `AuditRecorder` — append-only store with `record`/`query`, generalized
//! from the teacher's `AuditLogStore`/`AuditEventHandler` pair (which
//! captures every domain event generically) into the specific
//! `AuditRecord` shape this gateway needs, plus a new cursor index the
//! teacher's store never needed (it only ever supported `add`/`all`).

use crate::error::{AuditRecorderError, Result};
use crate::filter::{AuditFilter, Cursor, Page};
use crate::record::AuditRecord;
use dashmap::DashMap;
use kernel::EntityId;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct IndexKey(i128, EntityId);

pub struct AuditRecorder {
    records: DashMap<EntityId, AuditRecord>,
    index: RwLock<BTreeSet<IndexKey>>,
}

impl AuditRecorder {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            index: RwLock::new(BTreeSet::new()),
        }
    }

    /// Idempotent for an identical record id (spec.md §4.6 invariant).
    #[instrument(skip(self, record), fields(record_id = %record.id))]
    pub fn record(&self, record: AuditRecord) -> Result<()> {
        if self.records.contains_key(&record.id) {
            return Ok(());
        }
        let key = IndexKey(record.timestamp.unix_timestamp_nanos(), record.id.clone());
        self.index.write().insert(key);
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// The only mutation this store ever performs on an existing record.
    #[instrument(skip(self))]
    pub fn set_siem_forwarded_at(&self, id: &EntityId, at: time::OffsetDateTime) -> Result<()> {
        let mut entry = self
            .records
            .get_mut(id)
            .ok_or_else(|| AuditRecorderError::NotFound(id.to_string()))?;
        if entry.siem_forwarded_at.is_none() {
            entry.siem_forwarded_at = Some(at);
        }
        Ok(())
    }

    pub fn get(&self, id: &EntityId) -> Result<AuditRecord> {
        self.records
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| AuditRecorderError::NotFound(id.to_string()))
    }

    /// Cursor-based pagination over `(timestamp, id)` — never offset-based
    /// (spec.md §4.6), so concurrent inserts never skew a page.
    pub fn query(&self, filter: &AuditFilter, cursor: Option<Cursor>, limit: usize) -> Page {
        let index = self.index.read();
        let start = cursor
            .map(|c| IndexKey(c.timestamp_ns, c.id))
            .unwrap_or(IndexKey(i128::MIN, EntityId::new("")));

        let mut matched = Vec::new();
        let mut next_cursor = None;

        // `start` (when a cursor was supplied) names the first record still
        // owed to the caller, not the last one already returned — so the
        // range stays inclusive of it.
        for key in index.range(start..) {
            let Some(entry) = self.records.get(&key.1) else { continue };
            if !filter_matches_one(filter, &entry) {
                continue;
            }
            if matched.len() == limit {
                next_cursor = Some(Cursor {
                    timestamp_ns: key.0,
                    id: key.1.clone(),
                });
                break;
            }
            matched.push(entry.clone());
        }

        Page {
            records: matched,
            next_cursor,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn filter_matches_one(filter: &AuditFilter, record: &AuditRecord) -> bool {
    filter.retain(std::iter::once(record)).len() == 1
}

impl Default for AuditRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::PrincipalKind;
    use std::time::Duration;

    fn record(id: &str, ts_secs: i64, principal: &str) -> AuditRecord {
        AuditRecord {
            id: EntityId::new(id),
            timestamp: time::OffsetDateTime::from_unix_timestamp(ts_secs).unwrap(),
            principal_id: EntityId::new(principal),
            principal_kind: PrincipalKind::User,
            action: "tool:invoke".into(),
            resource_id: Some(EntityId::new("r1")),
            capability_id: None,
            allow: true,
            reason: "role".into(),
            policies_evaluated: vec!["role".into()],
            duration: Duration::from_millis(5),
            client_ip: None,
            request_id: "req-1".into(),
            siem_forwarded_at: None,
        }
    }

    #[test]
    fn record_is_idempotent_for_same_id() {
        let recorder = AuditRecorder::new();
        recorder.record(record("a1", 100, "u1")).unwrap();
        recorder.record(record("a1", 100, "u1")).unwrap();
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn query_orders_by_timestamp_then_id() {
        let recorder = AuditRecorder::new();
        recorder.record(record("b", 200, "u1")).unwrap();
        recorder.record(record("a", 100, "u1")).unwrap();
        recorder.record(record("c", 100, "u2")).unwrap();

        let page = recorder.query(&AuditFilter::default(), None, 10);
        let ids: Vec<_> = page.records.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn cursor_pagination_never_repeats_or_skips() {
        let recorder = AuditRecorder::new();
        for i in 0..5 {
            recorder.record(record(&format!("r{i}"), 100 + i, "u1")).unwrap();
        }

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = recorder.query(&AuditFilter::default(), cursor.clone(), 2);
            seen.extend(page.records.iter().map(|r| r.id.to_string()));
            if page.next_cursor.is_none() {
                break;
            }
            cursor = page.next_cursor;
        }
        assert_eq!(seen, vec!["r0", "r1", "r2", "r3", "r4"]);
    }

    #[test]
    fn set_siem_forwarded_at_is_write_once() {
        let recorder = AuditRecorder::new();
        recorder.record(record("a1", 100, "u1")).unwrap();
        let t1 = time::OffsetDateTime::from_unix_timestamp(200).unwrap();
        let t2 = time::OffsetDateTime::from_unix_timestamp(300).unwrap();
        recorder.set_siem_forwarded_at(&EntityId::new("a1"), t1).unwrap();
        recorder.set_siem_forwarded_at(&EntityId::new("a1"), t2).unwrap();
        assert_eq!(recorder.get(&EntityId::new("a1")).unwrap().siem_forwarded_at, Some(t1));
    }
}
