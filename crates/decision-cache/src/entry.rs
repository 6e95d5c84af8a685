//! A single cached decision plus its freshness window.

use kernel::{Decision, Sensitivity};

/// Fraction of the TTL, counted back from `fresh_until`, during which an
/// entry is stale-but-usable (spec.md §4.3 "last 30% of TTL").
const STALE_WINDOW_FRACTION: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub decision: Decision,
    pub principal_id: String,
    pub resource_id: Option<String>,
    /// Hard cutoff — never served past this, regardless of sensitivity tier.
    pub fresh_until: time::OffsetDateTime,
    /// `Some` only for sensitivity tiers that support stale-while-revalidate;
    /// `[stale_from, fresh_until)` is the stale-but-usable window.
    pub stale_from: Option<time::OffsetDateTime>,
}

impl CacheEntry {
    pub fn new(
        decision: Decision,
        principal_id: impl Into<String>,
        resource_id: Option<String>,
        sensitivity: Sensitivity,
        now: time::OffsetDateTime,
    ) -> Self {
        let ttl = sensitivity.cache_ttl();
        let ttl = time::Duration::try_from(ttl).unwrap_or(time::Duration::ZERO);
        let fresh_until = now + ttl;
        let stale_window_ns = (ttl.whole_nanoseconds() as f64 * STALE_WINDOW_FRACTION) as i64;
        let stale_from = sensitivity
            .supports_stale_while_revalidate()
            .then(|| fresh_until - time::Duration::nanoseconds(stale_window_ns));
        Self {
            decision,
            principal_id: principal_id.into(),
            resource_id,
            fresh_until,
            stale_from,
        }
    }

    pub fn is_fresh(&self, now: time::OffsetDateTime) -> bool {
        match self.stale_from {
            Some(stale_from) => now < stale_from,
            None => now < self.fresh_until,
        }
    }

    pub fn is_stale_but_usable(&self, now: time::OffsetDateTime) -> bool {
        match self.stale_from {
            Some(stale_from) => now >= stale_from && now < self.fresh_until,
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum CacheLookup {
    Fresh(Decision),
    Stale(Decision),
    Miss,
}
