pub mod event_bus;

pub use event_bus::{DomainEvent, EventBus, EventEnvelope, EventHandler, EventPublisher, Subscription};
