//! Per-sink batching/retrying/circuit-breaking shipper (spec.md §4.7).
//!
//! One `SiemForwarder` owns many sinks; each sink gets its own queue,
//! circuit breaker and dead-letter queue so a failing SIEM collector never
//! blocks shipment to a healthy one. Progress is a `last_forwarded_id`
//! cursor recorded back onto the audit store via `set_siem_forwarded_at`,
//! so a restart resumes without re-shipping already-forwarded records.

use crate::adapter::SinkAdapter;
use crate::circuit_breaker::{CircuitBreaker, CircuitConfig, CircuitState};
use crate::dead_letter::DeadLetterQueue;
use crate::error::{ForwarderError, Result};
use crate::queue::SinkQueue;
use audit_recorder::{AuditRecord, AuditRecorder};
use dashmap::DashMap;
use kernel::{Clock, EntityId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};

#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub batch_size: usize,
    pub batch_interval: Duration,
    pub max_attempts: u32,
    pub retry_base: Duration,
    pub retry_cap: Duration,
    pub queue_capacity: usize,
    pub circuit: CircuitConfig,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            batch_interval: Duration::from_secs(5),
            max_attempts: 3,
            retry_base: Duration::from_secs(2),
            retry_cap: Duration::from_secs(60),
            queue_capacity: 20_000,
            circuit: CircuitConfig::default(),
        }
    }
}

struct SinkState {
    adapter: Arc<dyn SinkAdapter>,
    queue: SinkQueue,
    breaker: CircuitBreaker,
    dead_letter: DeadLetterQueue,
    config: SinkConfig,
    last_forwarded_id: parking_lot::RwLock<Option<EntityId>>,
}

pub struct SiemForwarder {
    sinks: DashMap<String, Arc<SinkState>>,
    audit: Arc<AuditRecorder>,
    clock: Arc<dyn Clock>,
}

/// Outcome of one batch-shipping attempt, for callers that drive the
/// forwarder loop themselves (tests, or a scheduler task).
#[derive(Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing queued, nothing to do.
    Empty,
    Shipped { count: usize },
    DeadLettered { count: usize },
    CircuitOpen,
}

impl SiemForwarder {
    pub fn new(audit: Arc<AuditRecorder>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sinks: DashMap::new(),
            audit,
            clock,
        }
    }

    pub fn register_sink(&self, sink_id: impl Into<String>, adapter: Arc<dyn SinkAdapter>, config: SinkConfig) {
        let sink_id = sink_id.into();
        let breaker = CircuitBreaker::new(sink_id.clone(), config.circuit.clone(), self.clock.clone());
        self.sinks.insert(
            sink_id,
            Arc::new(SinkState {
                adapter,
                queue: SinkQueue::new(config.queue_capacity),
                breaker,
                dead_letter: DeadLetterQueue::new(),
                config,
                last_forwarded_id: parking_lot::RwLock::new(None),
            }),
        );
    }

    pub fn enqueue(&self, sink_id: &str, record: AuditRecord) -> Result<()> {
        let sink = self.sink(sink_id)?;
        sink.queue.push(record);
        Ok(())
    }

    pub fn queue_depth(&self, sink_id: &str) -> Result<usize> {
        Ok(self.sink(sink_id)?.queue.len())
    }

    pub fn evicted_count(&self, sink_id: &str) -> Result<u64> {
        Ok(self.sink(sink_id)?.queue.evicted_count())
    }

    pub fn dead_letter_count(&self, sink_id: &str) -> Result<usize> {
        Ok(self.sink(sink_id)?.dead_letter.len())
    }

    pub fn circuit_state(&self, sink_id: &str) -> Result<CircuitState> {
        Ok(self.sink(sink_id)?.breaker.state())
    }

    pub fn last_forwarded_id(&self, sink_id: &str) -> Result<Option<EntityId>> {
        Ok(self.sink(sink_id)?.last_forwarded_id.read().clone())
    }

    /// Drains and ships one batch for `sink_id`, honoring batch size, the
    /// circuit breaker, and the sink's adapter payload cap. Retries with
    /// exponential backoff inline; on final failure the batch is
    /// dead-lettered and the queue is not refilled with it.
    #[instrument(skip(self), fields(sink = sink_id))]
    pub async fn ship_batch(&self, sink_id: &str) -> Result<BatchOutcome> {
        let sink = self.sink(sink_id)?;

        if sink.queue.is_empty() {
            return Ok(BatchOutcome::Empty);
        }

        if !sink.breaker.try_acquire() {
            return Ok(BatchOutcome::CircuitOpen);
        }

        let batch_size = sink.config.batch_size.min(sink.adapter.max_payload_size());
        let batch = sink.queue.drain_batch(batch_size);
        if batch.is_empty() {
            return Ok(BatchOutcome::Empty);
        }

        let mut attempt = 0;
        loop {
            match sink.adapter.send_batch(&batch).await {
                Ok(count) => {
                    sink.breaker.record_success();
                    self.advance_cursor(&sink, &batch);
                    return Ok(BatchOutcome::Shipped { count });
                }
                Err(e) => {
                    sink.breaker.record_failure();
                    attempt += 1;
                    if attempt >= sink.config.max_attempts {
                        warn!(sink = sink_id, error = %e, "batch exhausted retries, moving to dead-letter");
                        let count = batch.len();
                        sink.dead_letter.push(batch);
                        return Ok(BatchOutcome::DeadLettered { count });
                    }
                    let backoff = sink.config.retry_base.saturating_mul(1 << (attempt - 1)).min(sink.config.retry_cap);
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    fn advance_cursor(&self, sink: &SinkState, batch: &[AuditRecord]) {
        let now = self.clock.now();
        for record in batch {
            let _ = self.audit.set_siem_forwarded_at(&record.id, now);
        }
        if let Some(last) = batch.last() {
            *sink.last_forwarded_id.write() = Some(last.id.clone());
        }
    }

    fn sink(&self, sink_id: &str) -> Result<Arc<SinkState>> {
        self.sinks
            .get(sink_id)
            .map(|e| e.value().clone())
            .ok_or_else(|| ForwarderError::UnknownSink(sink_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_adapter::InMemorySinkAdapter;
    use kernel::{FixedClock, PrincipalKind};

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

    fn forwarder() -> (SiemForwarder, Arc<AuditRecorder>) {
        let audit = Arc::new(AuditRecorder::new());
        let clock = Arc::new(FixedClock::from_secs(0));
        (SiemForwarder::new(audit.clone(), clock), audit)
    }

    #[tokio::test]
    async fn ships_queued_batch_and_advances_cursor() {
        let (fwd, audit) = forwarder();
        let adapter = Arc::new(InMemorySinkAdapter::new(1000));
        fwd.register_sink("splunk", adapter.clone(), SinkConfig::default());
        audit.record(record("a1")).unwrap();
        fwd.enqueue("splunk", record("a1")).unwrap();

        let outcome = fwd.ship_batch("splunk").await.unwrap();
        assert_eq!(outcome, BatchOutcome::Shipped { count: 1 });
        assert_eq!(fwd.last_forwarded_id("splunk").unwrap(), Some(EntityId::new("a1")));
        assert!(audit.get(&EntityId::new("a1")).unwrap().siem_forwarded_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn retries_then_dead_letters_after_exhausting_attempts() {
        let (fwd, _audit) = forwarder();
        let adapter = Arc::new(InMemorySinkAdapter::new(1000));
        let config = SinkConfig {
            max_attempts: 2,
            retry_base: Duration::from_millis(10),
            ..Default::default()
        };
        fwd.register_sink("failing", adapter.clone(), config);
        fwd.enqueue("failing", record("a1")).unwrap();
        adapter.fail_next_call();
        adapter.fail_next_call();

        let outcome = fwd.ship_batch("failing").await.unwrap();
        assert_eq!(outcome, BatchOutcome::DeadLettered { count: 1 });
        assert_eq!(fwd.dead_letter_count("failing").unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_queue_is_a_no_op() {
        let (fwd, _audit) = forwarder();
        let adapter = Arc::new(InMemorySinkAdapter::new(1000));
        fwd.register_sink("splunk", adapter, SinkConfig::default());
        assert_eq!(fwd.ship_batch("splunk").await.unwrap(), BatchOutcome::Empty);
    }

    #[tokio::test]
    async fn open_circuit_refuses_shipment() {
        let (fwd, _audit) = forwarder();
        let adapter = Arc::new(InMemorySinkAdapter::new(1000));
        let config = SinkConfig {
            circuit: CircuitConfig {
                failure_threshold: 1,
                ..Default::default()
            },
            max_attempts: 1,
            retry_base: Duration::from_millis(1),
            ..Default::default()
        };
        fwd.register_sink("splunk", adapter.clone(), config);
        fwd.enqueue("splunk", record("a1")).unwrap();
        adapter.fail_next_call();
        let _ = fwd.ship_batch("splunk").await.unwrap();
        assert_eq!(fwd.circuit_state("splunk").unwrap(), CircuitState::Open);

        fwd.enqueue("splunk", record("a2")).unwrap();
        assert_eq!(fwd.ship_batch("splunk").await.unwrap(), BatchOutcome::CircuitOpen);
    }
}
