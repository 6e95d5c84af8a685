//! `CredentialVerifier`: turns a bearer token, API key, or agent token into
//! a `Principal` (spec.md §4.1). Invalid credentials never reveal which
//! sub-check failed — a single generic reason surfaces to the caller.

use crate::claims::BearerClaims;
use crate::ports::{ApiKeyRegistry, SessionLookup};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use kernel::{Clock, ErrorKind, Principal, PrincipalKind, TrustLevel};
use ring::digest;
use std::sync::Arc;
use tracing::instrument;

/// Symmetric clock-skew tolerance applied to `nbf`/`exp` (spec.md §4.1).
pub const CLOCK_SKEW_TOLERANCE_SECS: i64 = 30;

const GENERIC_REASON: &str = "invalid credentials";

pub struct CredentialVerifier<S: SessionLookup, A: ApiKeyRegistry> {
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    session_lookup: Arc<S>,
    api_key_registry: Arc<A>,
    clock: Arc<dyn Clock>,
}

impl<S: SessionLookup, A: ApiKeyRegistry> CredentialVerifier<S, A> {
    pub fn new(decoding_key: DecodingKey, algorithm: Algorithm, session_lookup: Arc<S>, api_key_registry: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            decoding_key,
            algorithm,
            session_lookup,
            api_key_registry,
            clock,
        }
    }

    fn now_secs(&self) -> i64 {
        (self.clock.now_ns() / 1_000_000_000) as i64
    }

    fn decode_claims(&self, token: &str) -> Result<BearerClaims, ErrorKind> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        jsonwebtoken::decode::<BearerClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| ErrorKind::Unauthenticated(GENERIC_REASON.into()))
    }

    fn check_window(&self, claims: &BearerClaims) -> Result<(), ErrorKind> {
        let now = self.now_secs();
        if now < claims.nbf - CLOCK_SKEW_TOLERANCE_SECS || now > claims.exp + CLOCK_SKEW_TOLERANCE_SECS {
            return Err(ErrorKind::Unauthenticated(GENERIC_REASON.into()));
        }
        Ok(())
    }

    fn principal_from_claims(&self, claims: BearerClaims) -> Principal {
        let kind = match claims.kind.as_deref() {
            Some("service") => PrincipalKind::Service,
            Some("agent") => PrincipalKind::Agent,
            _ => PrincipalKind::User,
        };
        let mut principal = Principal::new(claims.sub.clone(), claims.display_name.unwrap_or(claims.sub), kind);
        principal.roles = claims.roles;
        principal.teams = claims.teams;
        principal.session_id = claims.session_id.map(kernel::EntityId::from);
        if let Some(mfa_at) = claims.mfa_at {
            principal.mfa_verified = true;
            principal.mfa_at = time::OffsetDateTime::from_unix_timestamp(mfa_at).ok();
        }
        principal.trust_level = claims.trust_level.as_deref().map(|t| match t {
            "trusted" => TrustLevel::Trusted,
            "limited" => TrustLevel::Limited,
            _ => TrustLevel::Untrusted,
        });
        principal
    }

    #[instrument(skip(self, token))]
    pub async fn verify_bearer(&self, token: &str) -> Result<Principal, ErrorKind> {
        let claims = self.decode_claims(token)?;
        self.check_window(&claims)?;

        if let Some(session_id) = claims.session_id.clone() {
            if self.session_lookup.is_revoked(&session_id).await {
                return Err(ErrorKind::Unauthenticated(GENERIC_REASON.into()));
            }
        }

        Ok(self.principal_from_claims(claims))
    }

    /// `key` is `"<key_id>.<secret>"`; the secret is hashed and compared in
    /// constant time against the registry's stored hash.
    #[instrument(skip(self, key))]
    pub async fn verify_api_key(&self, key: &str) -> Result<Principal, ErrorKind> {
        let (key_id, secret) = key
            .split_once('.')
            .ok_or_else(|| ErrorKind::Unauthenticated(GENERIC_REASON.into()))?;

        let record = self
            .api_key_registry
            .lookup(key_id)
            .await
            .ok_or_else(|| ErrorKind::Unauthenticated(GENERIC_REASON.into()))?;

        let computed = digest::digest(&digest::SHA256, secret.as_bytes());
        ring::constant_time::verify_slices(computed.as_ref(), &record.key_hash)
            .map_err(|_| ErrorKind::Unauthenticated(GENERIC_REASON.into()))?;

        let mut principal = Principal::new(record.principal_id, record.display_name, PrincipalKind::Service);
        principal.roles = record.roles;
        principal.teams = record.teams;
        Ok(principal)
    }

    #[instrument(skip(self, token))]
    pub async fn verify_agent(&self, token: &str) -> Result<Principal, ErrorKind> {
        let principal = self.verify_bearer(token).await?;
        if principal.kind != PrincipalKind::Agent || principal.trust_level.is_none() {
            return Err(ErrorKind::Unauthenticated(GENERIC_REASON.into()));
        }
        Ok(principal)
    }
}
