//! `Decision` — the Policy Engine's output.

use crate::domain::attributes::ParameterMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub allow: bool,
    pub reason: String,
    /// Present iff `allow` (spec §3 invariant).
    pub filtered_parameters: Option<ParameterMap>,
    pub policies_evaluated: Vec<String>,
    pub evaluated_at: time::OffsetDateTime,
    pub cache_ttl_hint: Duration,
}

impl Decision {
    pub fn allow(
        reason: impl Into<String>,
        filtered_parameters: ParameterMap,
        policies_evaluated: Vec<String>,
        evaluated_at: time::OffsetDateTime,
        cache_ttl_hint: Duration,
    ) -> Self {
        Self {
            allow: true,
            reason: reason.into(),
            filtered_parameters: Some(filtered_parameters),
            policies_evaluated,
            evaluated_at,
            cache_ttl_hint,
        }
    }

    pub fn deny(
        reason: impl Into<String>,
        policies_evaluated: Vec<String>,
        evaluated_at: time::OffsetDateTime,
        cache_ttl_hint: Duration,
    ) -> Self {
        Self {
            allow: false,
            reason: reason.into(),
            filtered_parameters: None,
            policies_evaluated,
            evaluated_at,
            cache_ttl_hint,
        }
    }

    /// Convenience for error paths where no sensible TTL/cache placement
    /// applies — evaluation errors and timeouts are deny-closed and are
    /// never cached (spec §4.3 "cache is never the source of truth for
    /// denials" — but an error-path deny is never even offered to the
    /// cache by the pipeline).
    pub fn deny_uncached(reason: impl Into<String>, evaluated_at: time::OffsetDateTime) -> Self {
        Self::deny(reason, Vec::new(), evaluated_at, Duration::from_secs(0))
    }
}
