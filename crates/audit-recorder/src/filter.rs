//! Query filter and cursor pagination (spec.md §4.6): "pagination is
//! cursor-based over `(timestamp, id)` — never offset-based, to avoid skew
//! on concurrent inserts."

use kernel::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub principal_id: Option<EntityId>,
    pub resource_id: Option<EntityId>,
    pub capability_id: Option<String>,
    pub allow: Option<bool>,
    pub time_range: Option<(time::OffsetDateTime, time::OffsetDateTime)>,
    /// Matched against `request_id` — the nearest field `AuditRecord`
    /// carries to a correlation id (spec.md §4.6 names `correlation id`
    /// as a filter key but §3 only defines `request_id` on the record).
    pub correlation_id: Option<String>,
}

impl AuditFilter {
    fn matches(&self, record: &super::record::AuditRecord) -> bool {
        if let Some(principal_id) = &self.principal_id {
            if &record.principal_id != principal_id {
                return false;
            }
        }
        if let Some(resource_id) = &self.resource_id {
            if record.resource_id.as_ref() != Some(resource_id) {
                return false;
            }
        }
        if let Some(capability_id) = &self.capability_id {
            if record.capability_id.as_deref() != Some(capability_id.as_str()) {
                return false;
            }
        }
        if let Some(allow) = self.allow {
            if record.allow != allow {
                return false;
            }
        }
        if let Some((start, end)) = self.time_range {
            if record.timestamp < start || record.timestamp > end {
                return false;
            }
        }
        if let Some(correlation_id) = &self.correlation_id {
            if &record.request_id != correlation_id {
                return false;
            }
        }
        true
    }

    pub fn retain<'a>(&self, records: impl IntoIterator<Item = &'a super::record::AuditRecord>) -> Vec<&'a super::record::AuditRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Opaque resume point: the `(timestamp, id)` of the last record seen.
/// Serializable so the HTTP audit-query endpoint can hand it back to a
/// caller for the next page (spec.md §4.6).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cursor {
    pub timestamp_ns: i128,
    pub id: EntityId,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub records: Vec<super::record::AuditRecord>,
    pub next_cursor: Option<Cursor>,
}
