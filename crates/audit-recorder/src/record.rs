//! `AuditRecord` — owned exclusively by this crate (spec.md §3 Ownership).

use kernel::{EntityId, PrincipalKind};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: EntityId,
    pub timestamp: time::OffsetDateTime,
    pub principal_id: EntityId,
    pub principal_kind: PrincipalKind,
    pub action: String,
    pub resource_id: Option<EntityId>,
    pub capability_id: Option<String>,
    pub allow: bool,
    pub reason: String,
    pub policies_evaluated: Vec<String>,
    pub duration: Duration,
    pub client_ip: Option<IpAddr>,
    pub request_id: String,
    /// The only field this crate ever mutates after insertion (spec.md
    /// §4.6 invariant).
    pub siem_forwarded_at: Option<time::OffsetDateTime>,
}

/// Monotonic tie-break for records sharing a timestamp (spec.md §3 notes
/// ids should "embed monotonically increasing time so secondary ordering
/// by id breaks ties deterministically"; this workspace's pinned `uuid`
/// dependency only enables the `v4` feature, so ordering is carried by a
/// process-local monotonic counter rather than a ULID/UUIDv7 bit layout).
pub struct RecordIdGenerator {
    counter: std::sync::atomic::AtomicU64,
}

impl RecordIdGenerator {
    pub fn new() -> Self {
        Self {
            counter: std::sync::atomic::AtomicU64::new(0),
        }
    }

    pub fn next(&self) -> EntityId {
        let seq = self.counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        EntityId::new(format!("{:020}-{}", seq, uuid::Uuid::new_v4()))
    }
}

impl Default for RecordIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
