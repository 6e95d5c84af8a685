pub mod infrastructure;
pub mod ports;

pub use ports::{CapabilityCache, ProtocolAdapter, RegistryError, ResourceRepository};
