//! MFA-required gate (spec §4.2): any action ending in `:delete`, or any
//! action touching a critical resource, demands a verified MFA timestamp
//! within a configurable window.

use crate::policy::Policy;
use crate::verdict::PolicyVerdict;
use kernel::{AuthInput, Clock};

#[derive(Debug, Clone)]
pub struct MfaRequiredPolicy {
    pub window: time::Duration,
}

impl MfaRequiredPolicy {
    pub fn new(window: time::Duration) -> Self {
        Self { window }
    }
}

impl Policy for MfaRequiredPolicy {
    fn label(&self) -> &str {
        "mfa_required"
    }

    fn evaluate(&self, input: &AuthInput, clock: &dyn Clock) -> PolicyVerdict {
        if !input.is_delete_action() && !input.touches_critical_resource() {
            return PolicyVerdict::Decline;
        }
        if input.principal.mfa_verified_within(self.window, clock.now()) {
            PolicyVerdict::allow("mfa")
        } else {
            PolicyVerdict::deny("mfa verification required")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::{FixedClock, Principal, PrincipalKind, RequestContext, Resource, Sensitivity};
    use std::collections::BTreeMap;

    fn input(action: &str, critical: bool, mfa_verified: bool, mfa_at: Option<time::OffsetDateTime>) -> AuthInput {
        let mut principal = Principal::new("u1", "u", PrincipalKind::User);
        principal.mfa_verified = mfa_verified;
        principal.mfa_at = mfa_at;
        AuthInput {
            action: action.into(),
            principal,
            resource: critical.then(|| Resource::new("r1", "r1", "mcp").with_sensitivity(Sensitivity::Critical)),
            capability: None,
            parameters: BTreeMap::new(),
            context: RequestContext::new("req-1", time::OffsetDateTime::from_unix_timestamp(1_000_000).unwrap()),
        }
    }

    #[test]
    fn declines_for_unrelated_action() {
        let policy = MfaRequiredPolicy::new(time::Duration::seconds(900));
        let clock = FixedClock::new(1_000_000_000_000_000);
        assert_eq!(policy.evaluate(&input("tool:read", false, false, None), &clock), PolicyVerdict::Decline);
    }

    #[test]
    fn delete_action_requires_recent_mfa() {
        let policy = MfaRequiredPolicy::new(time::Duration::seconds(900));
        let clock = FixedClock::new(1_000_000_000_000_000);
        let denied = policy.evaluate(&input("server:delete", false, false, None), &clock);
        assert!(denied.is_deny());

        let at = time::OffsetDateTime::from_unix_timestamp(1_000_000 - 300).unwrap();
        let allowed = policy.evaluate(&input("server:delete", false, true, Some(at)), &clock);
        assert_eq!(allowed, PolicyVerdict::allow("mfa"));
    }

    #[test]
    fn stale_mfa_outside_window_is_denied() {
        let policy = MfaRequiredPolicy::new(time::Duration::seconds(900));
        let clock = FixedClock::new(1_000_000_000_000_000);
        let at = time::OffsetDateTime::from_unix_timestamp(1_000_000 - 3600).unwrap();
        assert!(policy.evaluate(&input("server:delete", false, true, Some(at)), &clock).is_deny());
    }
}
