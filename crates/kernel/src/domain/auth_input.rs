//! `AuthInput` — the composed input submitted to the Policy Engine.

use crate::domain::attributes::ParameterMap;
use crate::domain::context::RequestContext;
use crate::domain::principal::Principal;
use crate::domain::resource::{Capability, Resource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthInput {
    pub action: String,
    pub principal: Principal,
    pub resource: Option<Resource>,
    pub capability: Option<Capability>,
    pub parameters: ParameterMap,
    pub context: RequestContext,
}

impl AuthInput {
    /// An action targeting a "critical" resource per spec §4.2's MFA gate
    /// ("any action... touching a critical resource").
    pub fn touches_critical_resource(&self) -> bool {
        self.resource
            .as_ref()
            .map(|r| r.sensitivity == crate::domain::sensitivity::Sensitivity::Critical)
            .unwrap_or(false)
    }

    /// spec §4.2: "any action ending in `:delete`... demands a verified MFA
    /// timestamp".
    pub fn is_delete_action(&self) -> bool {
        self.action.ends_with(":delete")
    }

    pub fn effective_sensitivity(&self) -> crate::domain::sensitivity::Sensitivity {
        match (&self.resource, &self.capability) {
            (Some(resource), Some(capability)) => capability.effective_sensitivity(resource),
            (Some(resource), None) => resource.sensitivity,
            _ => crate::domain::sensitivity::Sensitivity::Critical,
        }
    }
}
