//! Sink adapter contract (spec.md §4.7): `send_batch`/`health` plus the two
//! capability flags the forwarder needs before it can size a batch.

use crate::error::SendErrorKind;
use async_trait::async_trait;
use audit_recorder::AuditRecord;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkHealth {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

#[async_trait]
pub trait SinkAdapter: Send + Sync {
    /// Ships as many of `records` as the adapter will accept in one call,
    /// returning the count actually sent.
    async fn send_batch(&self, records: &[AuditRecord]) -> Result<usize, SendErrorKind>;

    async fn health(&self) -> SinkHealth;

    fn supports_batch(&self) -> bool;

    fn max_payload_size(&self) -> usize;
}

#[async_trait]
impl<T: SinkAdapter + ?Sized> SinkAdapter for Arc<T> {
    async fn send_batch(&self, records: &[AuditRecord]) -> Result<usize, SendErrorKind> {
        (**self).send_batch(records).await
    }

    async fn health(&self) -> SinkHealth {
        (**self).health().await
    }

    fn supports_batch(&self) -> bool {
        (**self).supports_batch()
    }

    fn max_payload_size(&self) -> usize {
        (**self).max_payload_size()
    }
}
