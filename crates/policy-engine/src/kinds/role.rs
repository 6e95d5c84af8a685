//! Role-based allow/deny (spec §4.2 built-in kind: "role-based allow/deny").

use crate::policy::Policy;
use crate::verdict::PolicyVerdict;
use kernel::{AuthInput, Clock};
use std::collections::BTreeSet;

/// Declines unless the principal holds at least one allowed role and holds
/// none of the denied roles. An empty `allowed_roles` means "any
/// authenticated principal" (declines never gate on role in that case).
pub struct RolePolicy {
    pub allowed_roles: BTreeSet<String>,
    pub denied_roles: BTreeSet<String>,
}

impl RolePolicy {
    pub fn new(allowed_roles: BTreeSet<String>, denied_roles: BTreeSet<String>) -> Self {
        Self {
            allowed_roles,
            denied_roles,
        }
    }
}

impl Policy for RolePolicy {
    fn label(&self) -> &str {
        "role"
    }

    fn evaluate(&self, input: &AuthInput, _clock: &dyn Clock) -> PolicyVerdict {
        if input
            .principal
            .roles
            .iter()
            .any(|r| self.denied_roles.contains(r))
        {
            return PolicyVerdict::deny("role denied");
        }
        if self.allowed_roles.is_empty()
            || input
                .principal
                .roles
                .iter()
                .any(|r| self.allowed_roles.contains(r))
        {
            return PolicyVerdict::allow("role");
        }
        PolicyVerdict::deny("role not permitted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::{FixedClock, Principal, PrincipalKind, RequestContext};
    use std::collections::BTreeMap;

    fn input_with_roles(roles: &[&str]) -> AuthInput {
        let mut principal = Principal::new("u1", "user one", PrincipalKind::User);
        for r in roles {
            principal = principal.with_role(*r);
        }
        AuthInput {
            action: "tool:invoke".into(),
            principal,
            resource: None,
            capability: None,
            parameters: BTreeMap::new(),
            context: RequestContext::new("req-1", time::OffsetDateTime::UNIX_EPOCH),
        }
    }

    #[test]
    fn denied_role_overrides_allowed_role() {
        let policy = RolePolicy::new(
            BTreeSet::from(["developer".to_string()]),
            BTreeSet::from(["suspended".to_string()]),
        );
        let input = input_with_roles(&["developer", "suspended"]);
        let clock = FixedClock::from_secs(0);
        assert!(policy.evaluate(&input, &clock).is_deny());
    }

    #[test]
    fn empty_allow_list_permits_any_role() {
        let policy = RolePolicy::new(BTreeSet::new(), BTreeSet::new());
        let input = input_with_roles(&["anything"]);
        let clock = FixedClock::from_secs(0);
        assert_eq!(policy.evaluate(&input, &clock), PolicyVerdict::allow("role"));
    }
}
