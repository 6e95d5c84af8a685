//! `Principal` — the authenticated identity a request is made on behalf of.
//!
//! Immutable after authentication for the duration of a request (spec §3).
//! Produced exclusively by the Credential Verifier, consumed by the
//! Authorization Pipeline and Policy Engine.

use crate::domain::id::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Service,
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    Trusted,
    Limited,
    Untrusted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub id: EntityId,
    pub display_name: String,
    pub kind: PrincipalKind,
    pub roles: BTreeSet<String>,
    pub teams: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    /// Required for `kind == Agent` (spec §4.1 `verify_agent`); `None` for
    /// users and services.
    pub trust_level: Option<TrustLevel>,
    pub mfa_verified: bool,
    pub mfa_at: Option<time::OffsetDateTime>,
    pub session_id: Option<EntityId>,
}

impl Principal {
    pub fn new(id: impl Into<EntityId>, display_name: impl Into<String>, kind: PrincipalKind) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind,
            roles: BTreeSet::new(),
            teams: BTreeSet::new(),
            attributes: BTreeMap::new(),
            trust_level: None,
            mfa_verified: false,
            mfa_at: None,
            session_id: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.teams.insert(team.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// True when `mfa_verified` and the verification happened within
    /// `window` of `now` (spec §4.2 MFA gates).
    pub fn mfa_verified_within(&self, window: time::Duration, now: time::OffsetDateTime) -> bool {
        match (self.mfa_verified, self.mfa_at) {
            (true, Some(at)) => now - at <= window,
            _ => false,
        }
    }
}
