//! Resource Registry: directory of resources and capabilities (spec.md
//! §4.4). Vertical-slice features, one in-memory backend.

pub mod features;
pub mod shared;

pub use shared::infrastructure::{InMemoryCapabilityCache, InMemoryResourceRepository, StaticProtocolAdapter};
pub use shared::ports::{CapabilityCache, ProtocolAdapter, RegistryError, ResourceRepository};
pub use features::get_capability::{GetCapabilityError, GetCapabilityUseCase};
pub use features::get_resource::{GetResourceError, GetResourceUseCase};
pub use features::list_resources::{ListResourcesError, ListResourcesUseCase};
pub use features::retire_resource::{RetireResourceError, RetireResourceUseCase};
pub use features::upsert_resource::{dto::{ResourceView, UpsertResourceCommand}, UpsertResourceError, UpsertResourceUseCase};
