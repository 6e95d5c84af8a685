//! Shared kernel for the authorization gateway workspace.
//!
//! Holds the cross-cutting domain types (`Principal`, `Resource`,
//! `Capability`, `AuthInput`, `Decision`), the shared error taxonomy, an
//! injectable `Clock`, and the in-process event bus. Every other crate in
//! the workspace depends on this one; this one depends on nothing in the
//! workspace.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::ports::{DomainEvent, EventBus, EventEnvelope, EventHandler, EventPublisher, Subscription};
pub use domain::{
    redact, AttributeValue, AuthInput, Capability, Clock, Decision, EmergencyOverride, EntityId,
    FixedClock, ParameterMap, Principal, PrincipalKind, RequestContext, Resource, Sensitivity,
    SystemClock, TrustLevel,
};
pub use error::{ErrorKind, Result};
pub use infrastructure::InMemoryEventBus;
