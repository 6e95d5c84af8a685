//! Cache-key fingerprinting: the normalized tuple frozen in DESIGN.md —
//! principal id, action, resource id, capability id, a normalized context
//! subset (client IP bucketed to /24, timestamp dropped,
//! `emergency_override` dropped since it always bypasses the cache), and
//! the policy corpus version.

use kernel::AuthInput;
use sha2::{Digest, Sha256};
use std::fmt;
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

fn bucketed_ip(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            format!("{}.{}.{}.0/24", octets[0], octets[1], octets[2])
        }
        IpAddr::V6(v6) => {
            // Bucket to the /48 boundary, a coarse analogue of the IPv4 /24.
            let segments = v6.segments();
            format!("{:x}:{:x}:{:x}::/48", segments[0], segments[1], segments[2])
        }
    }
}

/// Computes the fingerprint for `input` under a given policy corpus
/// version. Emergency-override requests always bypass the cache and
/// should never reach this function from the pipeline, but the function
/// itself stays pure and total.
pub fn fingerprint(input: &AuthInput, corpus_version: u64) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(input.principal.id.as_str().as_bytes());
    hasher.update(b"\0");
    hasher.update(input.action.as_bytes());
    hasher.update(b"\0");
    hasher.update(
        input
            .resource
            .as_ref()
            .map(|r| r.id.as_str())
            .unwrap_or("")
            .as_bytes(),
    );
    hasher.update(b"\0");
    hasher.update(
        input
            .capability
            .as_ref()
            .map(|c| c.id.as_str())
            .unwrap_or("")
            .as_bytes(),
    );
    hasher.update(b"\0");
    if let Some(ip) = input.context.client_ip {
        hasher.update(bucketed_ip(ip).as_bytes());
    }
    hasher.update(b"\0");
    hasher.update(corpus_version.to_le_bytes());

    let digest = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Fingerprint(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::{Principal, PrincipalKind, RequestContext};
    use std::collections::BTreeMap;

    fn input(ip: Option<IpAddr>) -> AuthInput {
        let mut context = RequestContext::new("req-1", time::OffsetDateTime::UNIX_EPOCH);
        if let Some(ip) = ip {
            context = context.with_client_ip(ip);
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
    fn ips_in_same_slash_24_collapse_to_same_fingerprint() {
        let a = fingerprint(&input(Some("10.0.0.5".parse().unwrap())), 1);
        let b = fingerprint(&input(Some("10.0.0.250".parse().unwrap())), 1);
        assert_eq!(a, b);
    }

    #[test]
    fn different_slash_24_ranges_differ() {
        let a = fingerprint(&input(Some("10.0.0.5".parse().unwrap())), 1);
        let b = fingerprint(&input(Some("10.0.1.5".parse().unwrap())), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn corpus_version_participates_in_fingerprint() {
        let a = fingerprint(&input(None), 1);
        let b = fingerprint(&input(None), 2);
        assert_ne!(a, b);
    }

    #[test]
    fn timestamp_and_request_id_do_not_affect_fingerprint() {
        let mut first = input(None);
        let mut second = input(None);
        first.context.request_id = "req-a".into();
        second.context.request_id = "req-b".into();
        first.context.timestamp = time::OffsetDateTime::UNIX_EPOCH;
        second.context.timestamp = time::OffsetDateTime::UNIX_EPOCH + time::Duration::days(1);
        assert_eq!(fingerprint(&first, 1), fingerprint(&second, 1));
    }
}
