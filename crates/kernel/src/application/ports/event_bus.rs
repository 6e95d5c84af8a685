//! Event bus abstraction for domain-driven event communication.
//!
//! Used to fan out `AuditRecord` creation from the Audit Recorder to the
//! SIEM Forwarder's tailer without coupling the two crates directly
//! (grounded on the teacher's shared-kernel event bus).

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Debug + Clone + 'static {
    fn event_type(&self) -> &'static str;

    fn aggregate_id(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Serialize, serde::Deserialize)]
#[serde(bound = "T: DomainEvent")]
pub struct EventEnvelope<T: DomainEvent> {
    pub event: T,
    pub event_id: uuid::Uuid,
    pub occurred_at: chrono::DateTime<chrono::Utc>,
    pub correlation_id: Option<String>,
    pub metadata: std::collections::HashMap<String, String>,
}

impl<T: DomainEvent> EventEnvelope<T> {
    pub fn new(event: T) -> Self {
        Self {
            event,
            event_id: uuid::Uuid::new_v4(),
            occurred_at: chrono::Utc::now(),
            correlation_id: None,
            metadata: std::collections::HashMap::new(),
        }
    }

    pub fn with_correlation(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

#[async_trait]
pub trait EventPublisher<T: DomainEvent>: Send + Sync {
    async fn publish(&self, envelope: EventEnvelope<T>) -> anyhow::Result<()>;
}

#[async_trait]
pub trait EventHandler<T: DomainEvent>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, envelope: EventEnvelope<T>) -> anyhow::Result<()>;

    fn should_handle(&self, _envelope: &EventEnvelope<T>) -> bool {
        true
    }
}

pub struct Subscription {
    pub handler_name: &'static str,
}

#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish<T: DomainEvent>(&self, envelope: EventEnvelope<T>) -> anyhow::Result<()>;
    async fn subscribe<T: DomainEvent>(
        &self,
        handler: std::sync::Arc<dyn EventHandler<T>>,
    ) -> anyhow::Result<Subscription>;
}
