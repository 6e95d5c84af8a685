//! `Resource` and `Capability` — registered backends and their named actions.
//!
//! Long-lived, mutated only via the Resource Registry (spec §3 Lifecycles).
//! Defined in `kernel` (not `resource-registry`) because the Policy Engine,
//! Decision Cache and Authorization Pipeline all need the type without
//! depending on the registry's storage concerns — mirrors the teacher's
//! `kernel::domain::entity::Resource` living in the shared kernel rather
//! than in any single bounded context.

use crate::domain::id::EntityId;
use crate::domain::sensitivity::Sensitivity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: EntityId,
    pub name: String,
    /// Protocol tag identifying the backend kind (e.g. "mcp", "http",
    /// "grpc"); used only to select a protocol adapter collaborator
    /// (spec §4.4) — opaque to the core otherwise.
    pub protocol: String,
    /// Opaque to the core; resolved by a protocol adapter, never
    /// dereferenced by the pipeline itself.
    pub endpoint: String,
    pub sensitivity: Sensitivity,
    pub owning_teams: BTreeSet<String>,
    pub authorized_teams: BTreeSet<String>,
    pub metadata: BTreeMap<String, String>,
    pub retired: bool,
}

impl Resource {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            protocol: protocol.into(),
            endpoint: String::new(),
            sensitivity: Sensitivity::default(),
            owning_teams: BTreeSet::new(),
            authorized_teams: BTreeSet::new(),
            metadata: BTreeMap::new(),
            retired: false,
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn with_authorized_team(mut self, team: impl Into<String>) -> Self {
        self.authorized_teams.insert(team.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    /// Unique within its owning resource, not globally.
    pub id: String,
    pub resource_id: EntityId,
    pub name: String,
    /// Opaque declared input schema; the core never interprets it.
    pub input_schema: Option<serde_json::Value>,
    /// Defaults to the owning resource's sensitivity when unset.
    pub sensitivity: Option<Sensitivity>,
    pub sensitive_parameter_keys: BTreeSet<String>,
}

impl Capability {
    pub fn new(id: impl Into<String>, resource_id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_id: resource_id.into(),
            name: name.into(),
            input_schema: None,
            sensitivity: None,
            sensitive_parameter_keys: BTreeSet::new(),
        }
    }

    pub fn effective_sensitivity(&self, resource: &Resource) -> Sensitivity {
        self.sensitivity.unwrap_or(resource.sensitivity)
    }

    pub fn with_sensitive_key(mut self, key: impl Into<String>) -> Self {
        self.sensitive_parameter_keys.insert(key.into());
        self
    }
}
