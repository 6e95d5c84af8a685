//! Per-sink bounded backlog (spec.md §4.7): newest-wins eviction once the
//! queue is full. The underlying audit record is never lost — C6 already
//! persisted it — only its SIEM shipment is abandoned, so eviction just
//! drops the oldest pending record and counts it.

use audit_recorder::AuditRecord;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct SinkQueue {
    capacity: usize,
    records: parking_lot::Mutex<VecDeque<AuditRecord>>,
    evicted: AtomicU64,
}

impl SinkQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: parking_lot::Mutex::new(VecDeque::with_capacity(capacity)),
            evicted: AtomicU64::new(0),
        }
    }

    /// Pushes a record, evicting the oldest queued one if already full.
    pub fn push(&self, record: AuditRecord) {
        let mut q = self.records.lock();
        if q.len() >= self.capacity {
            q.pop_front();
            self.evicted.fetch_add(1, Ordering::Relaxed);
        }
        q.push_back(record);
    }

    /// Drains up to `max` records in FIFO order for the next batch attempt.
    pub fn drain_batch(&self, max: usize) -> Vec<AuditRecord> {
        let mut q = self.records.lock();
        let n = max.min(q.len());
        q.drain(..n).collect()
    }

    /// Returns records to the front of the queue after a failed send, so a
    /// retry re-attempts the same batch before newer records.
    pub fn requeue_front(&self, records: Vec<AuditRecord>) {
        let mut q = self.records.lock();
        for record in records.into_iter().rev() {
            q.push_front(record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn evicted_count(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }
}
