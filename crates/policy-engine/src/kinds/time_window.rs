//! Time-window gating (spec §4.2): deny outside a configured window of
//! hours/weekdays, unless the request carries an emergency override.

use crate::policy::Policy;
use crate::verdict::PolicyVerdict;
use kernel::{AuthInput, Clock};
use time::Weekday;

#[derive(Debug, Clone)]
pub struct TimeWindowPolicy {
    pub start_hour: u8,
    pub end_hour: u8,
    pub allowed_weekdays: Vec<Weekday>,
}

impl TimeWindowPolicy {
    pub fn new(start_hour: u8, end_hour: u8, allowed_weekdays: Vec<Weekday>) -> Self {
        Self {
            start_hour,
            end_hour,
            allowed_weekdays,
        }
    }

    fn within_window(&self, now: time::OffsetDateTime) -> bool {
        if !self.allowed_weekdays.is_empty() && !self.allowed_weekdays.contains(&now.weekday()) {
            return false;
        }
        let hour = now.hour();
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

impl Policy for TimeWindowPolicy {
    fn label(&self) -> &str {
        "time_window"
    }

    fn evaluate(&self, input: &AuthInput, clock: &dyn Clock) -> PolicyVerdict {
        if input.context.has_emergency_override() {
            return PolicyVerdict::allow("time_window_override");
        }
        if self.within_window(clock.now()) {
            PolicyVerdict::allow("time_window")
        } else {
            PolicyVerdict::deny("outside permitted time window")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::{FixedClock, Principal, PrincipalKind, RequestContext};
    use std::collections::BTreeMap;

    fn input(emergency: bool) -> AuthInput {
        let mut context = RequestContext::new("req-1", time::OffsetDateTime::UNIX_EPOCH);
        if emergency {
            context = context.with_emergency_override("vp-oncall", "prod incident");
        }
        AuthInput {
            action: "tool:invoke".into(),
            principal: Principal::new("u1", "u", PrincipalKind::User),
            resource: None,
            capability: None,
            parameters: BTreeMap::new(),
            context,
        }
    }

    #[test]
    fn denies_outside_window() {
        // 1970-01-01T00:00:00Z is a Thursday, hour 0.
        let policy = TimeWindowPolicy::new(9, 17, vec![]);
        let clock = FixedClock::from_secs(0);
        assert!(policy.evaluate(&input(false), &clock).is_deny());
    }

    #[test]
    fn emergency_override_bypasses_window() {
        let policy = TimeWindowPolicy::new(9, 17, vec![]);
        let clock = FixedClock::from_secs(0);
        assert_eq!(
            policy.evaluate(&input(true), &clock),
            PolicyVerdict::allow("time_window_override")
        );
    }

    #[test]
    fn allows_inside_window() {
        let policy = TimeWindowPolicy::new(9, 17, vec![]);
        // 1970-01-01T12:00:00Z
        let clock = FixedClock::new(12 * 3600 * 1_000_000_000);
        assert_eq!(
            policy.evaluate(&input(false), &clock),
            PolicyVerdict::allow("time_window")
        );
    }
}
