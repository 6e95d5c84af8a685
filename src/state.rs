//! Axum application state: the one concrete `AuthorizationPipeline`
//! instantiation this binary wires up, plus the collaborators handlers
//! reach past the pipeline for (audit query, session issuance).

use authz_pipeline::AuthorizationPipeline;
use credential_verifier::InMemoryApiKeyRegistry;
use kernel::Clock;
use resource_registry::{InMemoryCapabilityCache, InMemoryResourceRepository, StaticProtocolAdapter};
use session_store::SessionStore;
use std::sync::Arc;

pub type GatewayPipeline = AuthorizationPipeline<
    SessionStore,
    InMemoryApiKeyRegistry,
    InMemoryResourceRepository,
    InMemoryCapabilityCache,
    StaticProtocolAdapter,
>;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<GatewayPipeline>,
    pub audit: Arc<audit_recorder::AuditRecorder>,
    pub sessions: Arc<SessionStore>,
    pub clock: Arc<dyn Clock>,
}
