//! Infrastructure layer for shared services and adapters.
pub mod in_memory_event_bus;

pub use in_memory_event_bus::InMemoryEventBus;
