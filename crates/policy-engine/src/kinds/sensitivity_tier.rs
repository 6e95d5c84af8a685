//! Sensitivity-tier gating (spec §4.2):
//! `critical` demands admin role *and* valid MFA within a configurable
//! window; `high` demands one of a configured role set; `low`/`medium`
//! allows any authenticated non-viewer.

use crate::policy::Policy;
use crate::verdict::PolicyVerdict;
use kernel::{AuthInput, Clock, Sensitivity};
use std::collections::BTreeSet;

pub struct SensitivityTierPolicy {
    pub admin_role: String,
    pub viewer_role: String,
    pub high_roles: BTreeSet<String>,
    pub mfa_window: time::Duration,
}

impl SensitivityTierPolicy {
    pub fn new(admin_role: impl Into<String>, viewer_role: impl Into<String>, high_roles: BTreeSet<String>, mfa_window: time::Duration) -> Self {
        Self {
            admin_role: admin_role.into(),
            viewer_role: viewer_role.into(),
            high_roles,
            mfa_window,
        }
    }
}

impl Policy for SensitivityTierPolicy {
    fn label(&self) -> &str {
        "sensitivity_tier"
    }

    fn evaluate(&self, input: &AuthInput, clock: &dyn Clock) -> PolicyVerdict {
        let sensitivity = input.effective_sensitivity();
        match sensitivity {
            Sensitivity::Critical => {
                let has_admin = input.principal.has_role(&self.admin_role);
                let has_mfa = input
                    .principal
                    .mfa_verified_within(self.mfa_window, clock.now());
                if has_admin && has_mfa {
                    PolicyVerdict::allow("critical")
                } else {
                    PolicyVerdict::deny("critical requires admin+mfa")
                }
            }
            Sensitivity::High => {
                if input
                    .principal
                    .roles
                    .iter()
                    .any(|r| self.high_roles.contains(r))
                {
                    PolicyVerdict::allow("high")
                } else {
                    PolicyVerdict::deny("high requires configured role")
                }
            }
            Sensitivity::Medium => {
                if input.principal.has_role(&self.viewer_role) {
                    PolicyVerdict::deny("medium forbidden for viewer")
                } else {
                    PolicyVerdict::allow("medium")
                }
            }
            Sensitivity::Low => {
                if input.principal.has_role(&self.viewer_role) {
                    PolicyVerdict::deny("low forbidden for viewer")
                } else {
                    PolicyVerdict::allow("low")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::{FixedClock, Principal, PrincipalKind, RequestContext, Resource};
    use std::collections::BTreeMap;

    fn policy() -> SensitivityTierPolicy {
        SensitivityTierPolicy::new(
            "admin",
            "viewer",
            BTreeSet::from(["operator".to_string()]),
            time::Duration::seconds(3600),
        )
    }

    fn input(sensitivity: Sensitivity, role: &str, mfa_verified: bool, mfa_at_secs_ago: i64) -> AuthInput {
        let mut principal = Principal::new("u1", "u", PrincipalKind::User).with_role(role);
        principal.mfa_verified = mfa_verified;
        if mfa_verified {
            principal.mfa_at = Some(time::OffsetDateTime::from_unix_timestamp(1_000_000 - mfa_at_secs_ago).unwrap());
        }
        AuthInput {
            action: "tool:invoke".into(),
            principal,
            resource: Some(Resource::new("r1", "r1", "mcp").with_sensitivity(sensitivity)),
            capability: None,
            parameters: BTreeMap::new(),
            context: RequestContext::new("req-1", time::OffsetDateTime::from_unix_timestamp(1_000_000).unwrap()),
        }
    }

    #[test]
    fn critical_requires_admin_and_fresh_mfa() {
        let p = policy();
        let clock = FixedClock::new(1_000_000_000_000_000);
        let denied = p.evaluate(&input(Sensitivity::Critical, "developer", false, 0), &clock);
        assert!(denied.is_deny());

        let allowed = p.evaluate(&input(Sensitivity::Critical, "admin", true, 600), &clock);
        assert_eq!(allowed, PolicyVerdict::allow("critical"));
    }

    #[test]
    fn low_allows_non_viewer() {
        let p = policy();
        let clock = FixedClock::new(1_000_000_000_000_000);
        assert_eq!(
            p.evaluate(&input(Sensitivity::Low, "developer", false, 0), &clock),
            PolicyVerdict::allow("low")
        );
    }

    #[test]
    fn low_forbids_viewer() {
        let p = policy();
        let clock = FixedClock::new(1_000_000_000_000_000);
        assert!(p.evaluate(&input(Sensitivity::Low, "viewer", false, 0), &clock).is_deny());
    }
}
