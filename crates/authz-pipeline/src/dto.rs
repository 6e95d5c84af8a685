//! Request/response shapes for the authorization pipeline (spec.md §4.5),
//! generalized from the teacher's `AuthorizationRequest`/`AuthorizationResponse`
//! pair in `evaluate_permissions/dto.rs`.

use kernel::{EntityId, ParameterMap, RequestContext};

/// Which credential-verification method the caller presented.
#[derive(Debug, Clone)]
pub enum Credential {
    Bearer(String),
    ApiKey(String),
    Agent(String),
}

#[derive(Debug, Clone)]
pub struct AuthorizeRequest {
    pub action: String,
    pub resource_id: Option<EntityId>,
    /// Resolved against the resource's protocol adapter via C4; requires
    /// `resource_id` to be set.
    pub capability_name: Option<String>,
    pub parameters: ParameterMap,
    pub context: RequestContext,
}

impl AuthorizeRequest {
    pub fn new(action: impl Into<String>, context: RequestContext) -> Self {
        Self {
            action: action.into(),
            resource_id: None,
            capability_name: None,
            parameters: ParameterMap::new(),
            context,
        }
    }

    pub fn with_resource(mut self, resource_id: impl Into<EntityId>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_capability(mut self, capability_name: impl Into<String>) -> Self {
        self.capability_name = Some(capability_name.into());
        self
    }
}
