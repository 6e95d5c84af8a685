//! Shared kernel: types truly cross-cutting across every bounded context
//! (principal/resource/capability/auth-input/decision shapes, ids, clock,
//! sensitivity tiers). No business logic lives here — only stable
//! abstractions, mirroring the teacher's `kernel::domain` module.

pub mod attributes;
pub mod auth_input;
pub mod clock;
pub mod context;
pub mod decision;
pub mod id;
pub mod principal;
pub mod resource;
pub mod sensitivity;

pub use attributes::{redact, AttributeValue, ParameterMap};
pub use auth_input::AuthInput;
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::{EmergencyOverride, RequestContext};
pub use decision::Decision;
pub use id::EntityId;
pub use principal::{Principal, PrincipalKind, TrustLevel};
pub use resource::{Capability, Resource};
pub use sensitivity::Sensitivity;
