//! `DecisionCache` — TTL/sensitivity-tiered cache with stale-while-
//! revalidate and single-flight revalidation coalescing.

use crate::entry::{CacheEntry, CacheLookup};
use crate::fingerprint::Fingerprint;
use dashmap::{DashMap, DashSet};
use kernel::{Clock, Decision, Sensitivity};
use std::sync::Arc;
use tokio::sync::Notify;

pub struct DecisionCache {
    entries: DashMap<Fingerprint, CacheEntry>,
    inflight: DashMap<Fingerprint, Arc<Notify>>,
    by_principal: DashMap<String, DashSet<Fingerprint>>,
    by_resource: DashMap<String, DashSet<Fingerprint>>,
    clock: Arc<dyn Clock>,
}

impl DecisionCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            inflight: DashMap::new(),
            by_principal: DashMap::new(),
            by_resource: DashMap::new(),
            clock,
        }
    }

    pub fn get(&self, fingerprint: Fingerprint) -> CacheLookup {
        let now = self.clock.now();
        match self.entries.get(&fingerprint) {
            Some(entry) if entry.is_fresh(now) => CacheLookup::Fresh(entry.decision.clone()),
            Some(entry) if entry.is_stale_but_usable(now) => CacheLookup::Stale(entry.decision.clone()),
            _ => CacheLookup::Miss,
        }
    }

    pub fn get_batch(&self, fingerprints: &[Fingerprint]) -> Vec<CacheLookup> {
        fingerprints.iter().map(|fp| self.get(*fp)).collect()
    }

    pub fn set(
        &self,
        fingerprint: Fingerprint,
        decision: Decision,
        principal_id: impl Into<String>,
        resource_id: Option<String>,
        sensitivity: Sensitivity,
    ) {
        let principal_id = principal_id.into();
        let now = self.clock.now();
        let entry = CacheEntry::new(decision, principal_id.clone(), resource_id.clone(), sensitivity, now);
        self.entries.insert(fingerprint, entry);

        self.by_principal.entry(principal_id).or_default().insert(fingerprint);
        if let Some(resource_id) = resource_id {
            self.by_resource.entry(resource_id).or_default().insert(fingerprint);
        }
    }

    /// Single-flight entry point: returns `true` if the caller won the race
    /// and must revalidate (and eventually call `set` then
    /// `finish_revalidation`); returns `false` if another task is already
    /// revalidating and the caller should `wait_for_revalidation` instead.
    pub fn try_begin_revalidation(&self, fingerprint: Fingerprint) -> bool {
        use dashmap::mapref::entry::Entry;
        match self.inflight.entry(fingerprint) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(Notify::new()));
                true
            }
        }
    }

    pub async fn wait_for_revalidation(&self, fingerprint: Fingerprint) {
        let notify = self.inflight.get(&fingerprint).map(|entry| Arc::clone(&entry));
        if let Some(notify) = notify {
            notify.notified().await;
        }
    }

    pub fn finish_revalidation(&self, fingerprint: Fingerprint) {
        if let Some((_, notify)) = self.inflight.remove(&fingerprint) {
            notify.notify_waiters();
        }
    }

    pub fn invalidate_principal(&self, principal_id: &str) {
        if let Some((_, fingerprints)) = self.by_principal.remove(principal_id) {
            for fingerprint in fingerprints.iter() {
                self.entries.remove(&*fingerprint);
            }
        }
    }

    pub fn invalidate_resource(&self, resource_id: &str) {
        if let Some((_, fingerprints)) = self.by_resource.remove(resource_id) {
            for fingerprint in fingerprints.iter() {
                self.entries.remove(&*fingerprint);
            }
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.inflight.clear();
        self.by_principal.clear();
        self.by_resource.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint as fp_of;
    use kernel::{FixedClock, Principal, PrincipalKind, RequestContext, Resource};
    use std::collections::BTreeMap;

    fn decision() -> Decision {
        Decision::allow("role", BTreeMap::new(), vec!["role".into()], time::OffsetDateTime::UNIX_EPOCH, std::time::Duration::from_secs(60))
    }

    fn input() -> kernel::AuthInput {
        kernel::AuthInput {
            action: "tool:invoke".into(),
            principal: Principal::new("u1", "u", PrincipalKind::User),
            resource: Some(Resource::new("r1", "r1", "mcp")),
            capability: None,
            parameters: BTreeMap::new(),
            context: RequestContext::new("req-1", time::OffsetDateTime::UNIX_EPOCH),
        }
    }

    #[test]
    fn fresh_hit_then_expiry_then_miss() {
        let clock = Arc::new(FixedClock::from_secs(0));
        let cache = DecisionCache::new(clock.clone());
        let fp = fp_of(&input(), 1);

        cache.set(fp, decision(), "u1", Some("r1".into()), Sensitivity::Critical);
        assert!(matches!(cache.get(fp), CacheLookup::Fresh(_)));

        clock.advance_secs(61);
        assert!(matches!(cache.get(fp), CacheLookup::Miss));
    }

    #[test]
    fn high_sensitivity_serves_stale_during_revalidation_window() {
        let clock = Arc::new(FixedClock::from_secs(0));
        let cache = DecisionCache::new(clock.clone());
        let fp = fp_of(&input(), 1);

        cache.set(fp, decision(), "u1", Some("r1".into()), Sensitivity::High);
        clock.advance_secs(100); // within the last 30% of the 120s TTL (stale from 84s)
        assert!(matches!(cache.get(fp), CacheLookup::Stale(_)));
    }

    #[test]
    fn high_sensitivity_denies_past_hard_ttl() {
        let clock = Arc::new(FixedClock::from_secs(0));
        let cache = DecisionCache::new(clock.clone());
        let fp = fp_of(&input(), 1);

        cache.set(fp, decision(), "u1", Some("r1".into()), Sensitivity::High);
        clock.advance_secs(121); // past the 120s hard TTL cutoff
        assert!(matches!(cache.get(fp), CacheLookup::Miss));
    }

    #[test]
    fn invalidate_principal_drops_entry() {
        let clock = Arc::new(FixedClock::from_secs(0));
        let cache = DecisionCache::new(clock);
        let fp = fp_of(&input(), 1);
        cache.set(fp, decision(), "u1", Some("r1".into()), Sensitivity::Low);
        cache.invalidate_principal("u1");
        assert!(matches!(cache.get(fp), CacheLookup::Miss));
    }

    #[test]
    fn single_flight_guard_only_admits_one_revalidator() {
        let clock = Arc::new(FixedClock::from_secs(0));
        let cache = DecisionCache::new(clock);
        let fp = fp_of(&input(), 1);
        assert!(cache.try_begin_revalidation(fp));
        assert!(!cache.try_begin_revalidation(fp));
        cache.finish_revalidation(fp);
        assert!(cache.try_begin_revalidation(fp));
    }
}
