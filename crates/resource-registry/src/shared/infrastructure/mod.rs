pub mod in_memory_capability_cache;
pub mod in_memory_repository;
pub mod static_protocol_adapter;

pub use in_memory_capability_cache::InMemoryCapabilityCache;
pub use in_memory_repository::InMemoryResourceRepository;
pub use static_protocol_adapter::StaticProtocolAdapter;
