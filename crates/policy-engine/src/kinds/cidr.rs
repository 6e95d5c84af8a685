//! CIDR allow/block gating (spec §4.2): allow only from configured ranges,
//! deny from configured blocklisted ranges, and require the client be on a
//! designated "VPN" range for critical resources.

use crate::policy::Policy;
use crate::verdict::PolicyVerdict;
use ipnet::IpNet;
use kernel::{AuthInput, Clock};
use std::net::IpAddr;

#[derive(Debug, Clone, Default)]
pub struct CidrPolicy {
    pub allowed_ranges: Vec<IpNet>,
    pub blocked_ranges: Vec<IpNet>,
    pub vpn_ranges: Vec<IpNet>,
}

impl CidrPolicy {
    pub fn new(allowed_ranges: Vec<IpNet>, blocked_ranges: Vec<IpNet>, vpn_ranges: Vec<IpNet>) -> Self {
        Self {
            allowed_ranges,
            blocked_ranges,
            vpn_ranges,
        }
    }

    fn matches_any(ranges: &[IpNet], ip: IpAddr) -> bool {
        ranges.iter().any(|net| net.contains(&ip))
    }
}

impl Policy for CidrPolicy {
    fn label(&self) -> &str {
        "cidr"
    }

    fn evaluate(&self, input: &AuthInput, _clock: &dyn Clock) -> PolicyVerdict {
        let Some(ip) = input.context.client_ip else {
            return PolicyVerdict::Decline;
        };

        if Self::matches_any(&self.blocked_ranges, ip) {
            return PolicyVerdict::deny("client ip in blocked range");
        }

        if input.touches_critical_resource() && !self.vpn_ranges.is_empty() && !Self::matches_any(&self.vpn_ranges, ip) {
            return PolicyVerdict::deny("critical resource requires vpn range");
        }

        if !self.allowed_ranges.is_empty() && !Self::matches_any(&self.allowed_ranges, ip) {
            return PolicyVerdict::deny("client ip outside allowed range");
        }

        PolicyVerdict::allow("cidr")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::{FixedClock, Principal, PrincipalKind, RequestContext, Resource, Sensitivity};
    use std::collections::BTreeMap;

    fn input(ip: Option<IpAddr>, critical: bool) -> AuthInput {
        let mut context = RequestContext::new("req-1", time::OffsetDateTime::UNIX_EPOCH);
        if let Some(ip) = ip {
            context = context.with_client_ip(ip);
        }
        AuthInput {
            action: "tool:invoke".into(),
            principal: Principal::new("u1", "u", PrincipalKind::User),
            resource: critical.then(|| Resource::new("r1", "r1", "mcp").with_sensitivity(Sensitivity::Critical)),
            capability: None,
            parameters: BTreeMap::new(),
            context,
        }
    }

    #[test]
    fn declines_without_client_ip() {
        let policy = CidrPolicy::default();
        let clock = FixedClock::from_secs(0);
        assert_eq!(policy.evaluate(&input(None, false), &clock), PolicyVerdict::Decline);
    }

    #[test]
    fn blocks_blocked_range_even_if_allowed() {
        let policy = CidrPolicy::new(
            vec!["10.0.0.0/8".parse().unwrap()],
            vec!["10.0.1.0/24".parse().unwrap()],
            vec![],
        );
        let clock = FixedClock::from_secs(0);
        let ip = Some("10.0.1.5".parse().unwrap());
        assert!(policy.evaluate(&input(ip, false), &clock).is_deny());
    }

    #[test]
    fn critical_resource_requires_vpn_range() {
        let policy = CidrPolicy::new(vec![], vec![], vec!["192.168.0.0/16".parse().unwrap()]);
        let clock = FixedClock::from_secs(0);
        let ip = Some("8.8.8.8".parse().unwrap());
        assert!(policy.evaluate(&input(ip, true), &clock).is_deny());

        let vpn_ip = Some("192.168.1.1".parse().unwrap());
        assert_eq!(
            policy.evaluate(&input(vpn_ip, true), &clock),
            PolicyVerdict::allow("cidr")
        );
    }
}
