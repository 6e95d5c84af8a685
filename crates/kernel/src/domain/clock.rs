//! Injectable wall-clock abstraction.
//!
//! Spec §4.2 / §9: rules (and anything else timing-sensitive — TTLs, MFA
//! windows, business-hours gates) may read wall-clock time only through an
//! injected `Clock`. Tests inject `FixedClock` so evaluation stays
//! deterministic.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// Nanoseconds since the Unix epoch.
    fn now_ns(&self) -> i128;

    fn now(&self) -> time::OffsetDateTime {
        time::OffsetDateTime::from_unix_timestamp_nanos(self.now_ns()).unwrap_or(time::OffsetDateTime::UNIX_EPOCH)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ns(&self) -> i128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before unix epoch")
            .as_nanos() as i128
    }
}

/// Test double: a clock pinned to a value, advanceable by the test.
#[derive(Debug)]
pub struct FixedClock {
    now_ns: AtomicI64,
}

impl FixedClock {
    pub fn new(now_ns: i64) -> Self {
        Self {
            now_ns: AtomicI64::new(now_ns),
        }
    }

    pub fn from_secs(now_secs: i64) -> Self {
        Self::new(now_secs * 1_000_000_000)
    }

    pub fn advance(&self, delta_ns: i64) {
        self.now_ns.fetch_add(delta_ns, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(secs * 1_000_000_000);
    }

    pub fn set_secs(&self, secs: i64) {
        self.now_ns.store(secs * 1_000_000_000, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ns(&self) -> i128 {
        self.now_ns.load(Ordering::SeqCst) as i128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances_deterministically() {
        let clock = FixedClock::from_secs(100);
        assert_eq!(clock.now_ns(), 100_000_000_000);
        clock.advance_secs(50);
        assert_eq!(clock.now_ns(), 150_000_000_000);
    }
}
