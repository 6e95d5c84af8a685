//! In-memory sink used by forwarder tests and local development.

use crate::adapter::{SinkAdapter, SinkHealth};
use crate::error::SendErrorKind;
use async_trait::async_trait;
use audit_recorder::AuditRecord;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct InMemorySinkAdapter {
    received: Mutex<Vec<AuditRecord>>,
    fail_next: AtomicBool,
    max_payload_size: usize,
}

impl InMemorySinkAdapter {
    pub fn new(max_payload_size: usize) -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
            max_payload_size,
        }
    }

    /// Test hook: the next `send_batch` call fails with a transport error.
    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<AuditRecord> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl SinkAdapter for InMemorySinkAdapter {
    async fn send_batch(&self, records: &[AuditRecord]) -> Result<usize, SendErrorKind> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SendErrorKind::Transport("simulated failure".into()));
        }
        self.received.lock().extend_from_slice(records);
        Ok(records.len())
    }

    async fn health(&self) -> SinkHealth {
        SinkHealth::Healthy
    }

    fn supports_batch(&self) -> bool {
        true
    }

    fn max_payload_size(&self) -> usize {
        self.max_payload_size
    }
}
