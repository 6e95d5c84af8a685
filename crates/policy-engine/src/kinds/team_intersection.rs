//! Team-intersection check between principal and resource (spec §4.2).

use crate::policy::Policy;
use crate::verdict::PolicyVerdict;
use kernel::{AuthInput, Clock};

/// Declines when there is no resource (nothing to intersect against).
/// Otherwise allows iff the principal's teams intersect the resource's
/// `authorized_teams`.
pub struct TeamIntersectionPolicy;

impl Policy for TeamIntersectionPolicy {
    fn label(&self) -> &str {
        "team"
    }

    fn evaluate(&self, input: &AuthInput, _clock: &dyn Clock) -> PolicyVerdict {
        let Some(resource) = &input.resource else {
            return PolicyVerdict::Decline;
        };
        if resource.authorized_teams.is_empty() {
            return PolicyVerdict::Decline;
        }
        if input
            .principal
            .teams
            .iter()
            .any(|t| resource.authorized_teams.contains(t))
        {
            PolicyVerdict::allow("team")
        } else {
            PolicyVerdict::deny("team not authorized for resource")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::{FixedClock, Principal, PrincipalKind, RequestContext, Resource};
    use std::collections::BTreeMap;

    fn base_input(resource: Option<Resource>) -> AuthInput {
        AuthInput {
            action: "tool:invoke".into(),
            principal: Principal::new("u1", "u", PrincipalKind::User).with_team("t1"),
            resource,
            capability: None,
            parameters: BTreeMap::new(),
            context: RequestContext::new("req-1", time::OffsetDateTime::UNIX_EPOCH),
        }
    }

    #[test]
    fn declines_without_resource() {
        let policy = TeamIntersectionPolicy;
        let clock = FixedClock::from_secs(0);
        assert_eq!(policy.evaluate(&base_input(None), &clock), PolicyVerdict::Decline);
    }

    #[test]
    fn allows_on_matching_team() {
        let resource = Resource::new("r1", "r1", "mcp").with_authorized_team("t1");
        let policy = TeamIntersectionPolicy;
        let clock = FixedClock::from_secs(0);
        assert_eq!(
            policy.evaluate(&base_input(Some(resource)), &clock),
            PolicyVerdict::allow("team")
        );
    }

    #[test]
    fn denies_on_disjoint_teams() {
        let resource = Resource::new("r1", "r1", "mcp").with_authorized_team("other-team");
        let policy = TeamIntersectionPolicy;
        let clock = FixedClock::from_secs(0);
        assert!(policy.evaluate(&base_input(Some(resource)), &clock).is_deny());
    }
}
