//! Stable identifiers shared across every bounded context.
//!
//! `EntityId` plays the role the teacher's `Hrn` plays: a single,
//! cheaply-cloneable identifier type that every crate in the workspace can
//! depend on without pulling in a concrete bounded context.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque stable identifier for a principal, resource, capability, session
/// or audit record.
///
/// Kept as a thin newtype over `String` (rather than `Uuid`) because
/// principals and resources are frequently identified by caller-supplied
/// strings (service account names, MCP server ids) that are not
/// necessarily UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
