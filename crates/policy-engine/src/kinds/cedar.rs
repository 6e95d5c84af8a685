//! Embedded Cedar policy set as one more built-in kind (spec §4.2:
//! "policies are expressed in an embedded declarative policy language").
//!
//! Grounded on the teacher's `AuthorizationEngine` (policies crate): Cedar
//! stays an implementation detail behind the `Policy` trait, never exposed
//! past this module.

use crate::policy::Policy;
use crate::verdict::PolicyVerdict;
use cedar_policy::{Authorizer, Context, Entities, EntityUid, PolicySet, Request};
use kernel::{AttributeValue, AuthInput, Clock};
use std::str::FromStr;

pub struct CedarPolicy {
    policy_set: PolicySet,
    authorizer: Authorizer,
}

impl CedarPolicy {
    pub fn new(policy_set: PolicySet) -> Self {
        Self {
            policy_set,
            authorizer: Authorizer::new(),
        }
    }

    pub fn from_policy_texts(texts: &[String]) -> Result<Self, cedar_policy::ParseErrors> {
        let mut set = PolicySet::new();
        for (idx, text) in texts.iter().enumerate() {
            let policy = cedar_policy::Policy::parse(Some(format!("policy_{idx}")), text)?;
            set.add(policy).expect("duplicate policy id");
        }
        Ok(Self::new(set))
    }
}

fn build_context(input: &AuthInput) -> Context {
    let json = serde_json::to_value(AttributeValue::Object(input.parameters.clone())).unwrap_or(serde_json::Value::Null);
    Context::from_json_value(json, None).unwrap_or_else(|_| Context::empty())
}

impl Policy for CedarPolicy {
    fn label(&self) -> &str {
        "cedar"
    }

    fn evaluate(&self, input: &AuthInput, _clock: &dyn Clock) -> PolicyVerdict {
        if self.policy_set.policies().count() == 0 {
            return PolicyVerdict::Decline;
        }
        let Some(resource) = &input.resource else {
            return PolicyVerdict::Decline;
        };

        let principal_uid = match EntityUid::from_str(&format!(r#"Gateway::Principal::"{}""#, input.principal.id)) {
            Ok(uid) => uid,
            Err(e) => return PolicyVerdict::Deny(format!("invalid cedar principal uid: {e}")),
        };
        let action_uid = match EntityUid::from_str(&format!(r#"Gateway::Action::"{}""#, input.action)) {
            Ok(uid) => uid,
            Err(e) => return PolicyVerdict::Deny(format!("invalid cedar action uid: {e}")),
        };
        let resource_uid = match EntityUid::from_str(&format!(r#"Gateway::Resource::"{}""#, resource.id)) {
            Ok(uid) => uid,
            Err(e) => return PolicyVerdict::Deny(format!("invalid cedar resource uid: {e}")),
        };

        let request = match Request::new(principal_uid, action_uid, resource_uid, build_context(input), None) {
            Ok(request) => request,
            Err(e) => return PolicyVerdict::Deny(format!("cedar request build failed: {e}")),
        };

        let response = self.authorizer.is_authorized(&request, &self.policy_set, &Entities::empty());
        match response.decision() {
            cedar_policy::Decision::Allow => PolicyVerdict::allow("cedar"),
            cedar_policy::Decision::Deny => PolicyVerdict::deny("denied by cedar policy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::{FixedClock, Principal, PrincipalKind, RequestContext, Resource};
    use std::collections::BTreeMap;

    fn input() -> AuthInput {
        AuthInput {
            action: "read".into(),
            principal: Principal::new("u1", "u", PrincipalKind::User),
            resource: Some(Resource::new("r1", "r1", "mcp")),
            capability: None,
            parameters: BTreeMap::new(),
            context: RequestContext::new("req-1", time::OffsetDateTime::UNIX_EPOCH),
        }
    }

    #[test]
    fn declines_without_loaded_policies() {
        let policy = CedarPolicy::new(PolicySet::new());
        let clock = FixedClock::from_secs(0);
        assert_eq!(policy.evaluate(&input(), &clock), PolicyVerdict::Decline);
    }

    #[test]
    fn permit_policy_allows() {
        let policy = CedarPolicy::from_policy_texts(&["permit(principal, action, resource);".to_string()]).unwrap();
        let clock = FixedClock::from_secs(0);
        assert_eq!(policy.evaluate(&input(), &clock), PolicyVerdict::allow("cedar"));
    }

    #[test]
    fn forbid_policy_denies() {
        let policy = CedarPolicy::from_policy_texts(&["forbid(principal, action, resource);".to_string()]).unwrap();
        let clock = FixedClock::from_secs(0);
        assert!(policy.evaluate(&input(), &clock).is_deny());
    }
}
