//! Per-sink dead-letter queue: batches that exhausted their retry budget
//! land here instead of being dropped, for later inspection or replay.

use audit_recorder::AuditRecord;
use parking_lot::Mutex;

pub struct DeadLetterQueue {
    batches: Mutex<Vec<Vec<AuditRecord>>>,
}

impl DeadLetterQueue {
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, batch: Vec<AuditRecord>) {
        self.batches.lock().push(batch);
    }

    pub fn len(&self) -> usize {
        self.batches.lock().iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.lock().is_empty()
    }

    pub fn drain(&self) -> Vec<Vec<AuditRecord>> {
        std::mem::take(&mut *self.batches.lock())
    }
}

impl Default for DeadLetterQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::{EntityId, PrincipalKind};
    use std::time::Duration;

    fn record(id: &str) -> AuditRecord {
        AuditRecord {
            id: EntityId::new(id),
            timestamp: time::OffsetDateTime::UNIX_EPOCH,
            principal_id: EntityId::new("u1"),
            principal_kind: PrincipalKind::User,
            action: "tool:invoke".into(),
            resource_id: None,
            capability_id: None,
            allow: true,
            reason: "role".into(),
            policies_evaluated: vec![],
            duration: Duration::from_millis(1),
            client_ip: None,
            request_id: "req".into(),
            siem_forwarded_at: None,
        }
    }

    #[test]
    fn accumulates_failed_batches() {
        let dlq = DeadLetterQueue::new();
        dlq.push(vec![record("a"), record("b")]);
        dlq.push(vec![record("c")]);
        assert_eq!(dlq.len(), 3);
        assert_eq!(dlq.drain().len(), 2);
        assert!(dlq.is_empty());
    }
}
