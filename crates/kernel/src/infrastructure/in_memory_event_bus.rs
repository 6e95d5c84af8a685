//! In-memory event bus using tokio broadcast channels.
//!
//! Suitable for a single-process gateway deployment; a distributed
//! deployment would swap this for a message-broker adapter without
//! changing `EventBus`'s shape (out of scope here per spec §1).

use crate::application::ports::event_bus::{DomainEvent, EventBus, EventEnvelope, EventHandler, Subscription};
use async_trait::async_trait;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::warn;

struct TypedChannel {
    sender: broadcast::Sender<Vec<u8>>,
}

pub struct InMemoryEventBus {
    channels: RwLock<HashMap<TypeId, TypedChannel>>,
    channel_capacity: usize,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    fn channel_for<T: DomainEvent>(&self) -> broadcast::Sender<Vec<u8>> {
        let type_id = TypeId::of::<T>();
        if let Some(ch) = self.channels.read().unwrap().get(&type_id) {
            return ch.sender.clone();
        }
        let mut channels = self.channels.write().unwrap();
        channels
            .entry(type_id)
            .or_insert_with(|| TypedChannel {
                sender: broadcast::channel(self.channel_capacity).0,
            })
            .sender
            .clone()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish<T: DomainEvent>(&self, envelope: EventEnvelope<T>) -> anyhow::Result<()> {
        let sender = self.channel_for::<T>();
        let bytes = serde_json::to_vec(&envelope)?;
        // A publish with no subscribers is not an error: handlers may
        // subscribe after the bus is constructed but before traffic starts.
        let _ = sender.send(bytes);
        Ok(())
    }

    async fn subscribe<T: DomainEvent>(
        &self,
        handler: std::sync::Arc<dyn EventHandler<T>>,
    ) -> anyhow::Result<Subscription> {
        let sender = self.channel_for::<T>();
        let mut receiver = sender.subscribe();
        let handler_name = handler.name();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(bytes) => match serde_json::from_slice::<EventEnvelope<T>>(&bytes) {
                        Ok(envelope) => {
                            if handler.should_handle(&envelope) {
                                if let Err(e) = handler.handle(envelope).await {
                                    warn!(handler = handler_name, error = %e, "event handler failed");
                                }
                            }
                        }
                        Err(e) => warn!(handler = handler_name, error = %e, "failed to decode event"),
                    },
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(handler = handler_name, skipped, "event subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Ok(Subscription { handler_name })
    }
}
