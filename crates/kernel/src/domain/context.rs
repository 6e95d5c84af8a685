//! Request context carried alongside an `AuthInput`.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyOverride {
    pub approver: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    pub client_ip: Option<IpAddr>,
    pub timestamp: time::OffsetDateTime,
    pub request_id: String,
    pub emergency_override: Option<EmergencyOverride>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>, timestamp: time::OffsetDateTime) -> Self {
        Self {
            client_ip: None,
            timestamp,
            request_id: request_id.into(),
            emergency_override: None,
        }
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    pub fn with_emergency_override(mut self, approver: impl Into<String>, reason: impl Into<String>) -> Self {
        self.emergency_override = Some(EmergencyOverride {
            approver: approver.into(),
            reason: reason.into(),
        });
        self
    }

    pub fn has_emergency_override(&self) -> bool {
        self.emergency_override.is_some()
    }
}
