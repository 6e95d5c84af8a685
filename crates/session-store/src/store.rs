//! `SessionStore` — creation, refresh rotation with replay-triggered
//! family revocation, revocation, lookup, and touch (spec.md §4.8).
//!
//! Concurrency: `refresh` is serialized per session family via a
//! short-lived `tokio::sync::Mutex` registry (spec.md §4.8's "per-session
//! exclusion only on the refresh path").

use crate::error::{Result, SessionStoreError};
use crate::session::Session;
use async_trait::async_trait;
use credential_verifier::SessionLookup;
use dashmap::DashMap;
use kernel::{Clock, EntityId};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{instrument, warn};

struct RefreshTokenEntry {
    session_id: EntityId,
    used: bool,
}

pub struct SessionStore {
    sessions: DashMap<EntityId, Session>,
    refresh_tokens: DashMap<String, RefreshTokenEntry>,
    family_locks: DashMap<EntityId, Arc<Mutex<()>>>,
    clock: Arc<dyn Clock>,
}

fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(digest)
}

fn random_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: DashMap::new(),
            refresh_tokens: DashMap::new(),
            family_locks: DashMap::new(),
            clock,
        }
    }

    fn family_lock(&self, family_id: &EntityId) -> Arc<Mutex<()>> {
        self.family_locks
            .entry(family_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    #[instrument(skip(self))]
    pub fn create(&self, principal_id: EntityId, ttl: time::Duration) -> (Session, String) {
        let now = self.clock.now();
        let session_id = EntityId::generate();
        let session = Session {
            id: session_id.clone(),
            principal_id,
            family_id: session_id.clone(),
            issued_at: now,
            expires_at: now + ttl,
            mfa_verified: false,
            mfa_at: None,
            last_seen: now,
            revoked: false,
        };

        let refresh_plaintext = random_token();
        self.refresh_tokens.insert(
            hash_token(&refresh_plaintext),
            RefreshTokenEntry {
                session_id: session_id.clone(),
                used: false,
            },
        );
        self.sessions.insert(session_id, session.clone());
        (session, refresh_plaintext)
    }

    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str, ttl: time::Duration) -> Result<(Session, String)> {
        let hash = hash_token(refresh_token);
        let session_id = self
            .refresh_tokens
            .get(&hash)
            .map(|entry| entry.session_id.clone())
            .ok_or(SessionStoreError::NotFound)?;

        let family_id = self
            .sessions
            .get(&session_id)
            .map(|session| session.family_id.clone())
            .ok_or(SessionStoreError::NotFound)?;

        let lock = self.family_lock(&family_id);
        let _guard = lock.lock().await;

        // Re-read under the lock: another task may have already consumed
        // this token while we waited.
        let mut entry = self.refresh_tokens.get_mut(&hash).ok_or(SessionStoreError::NotFound)?;
        if entry.used {
            drop(entry);
            warn!(family_id = %family_id, "refresh token replay detected; revoking session family");
            self.revoke_family(&family_id);
            return Err(SessionStoreError::ReplayDetected);
        }
        entry.used = true;
        drop(entry);

        let current = self.sessions.get(&session_id).ok_or(SessionStoreError::NotFound)?.clone();
        let now = self.clock.now();
        let new_session_id = EntityId::generate();
        let new_session = Session {
            id: new_session_id.clone(),
            principal_id: current.principal_id.clone(),
            family_id: family_id.clone(),
            issued_at: now,
            expires_at: now + ttl,
            mfa_verified: current.mfa_verified,
            mfa_at: current.mfa_at,
            last_seen: now,
            revoked: false,
        };

        let new_refresh_plaintext = random_token();
        self.refresh_tokens.insert(
            hash_token(&new_refresh_plaintext),
            RefreshTokenEntry {
                session_id: new_session_id.clone(),
                used: false,
            },
        );
        self.sessions.insert(new_session_id, new_session.clone());

        Ok((new_session, new_refresh_plaintext))
    }

    fn revoke_family(&self, family_id: &EntityId) {
        for mut entry in self.sessions.iter_mut() {
            if &entry.family_id == family_id {
                entry.revoked = true;
            }
        }
    }

    #[instrument(skip(self))]
    pub fn revoke(&self, session_id: &EntityId) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            session.revoked = true;
        }
    }

    pub fn lookup(&self, session_id: &EntityId) -> Option<Session> {
        self.sessions.get(session_id).map(|entry| entry.clone())
    }

    /// True when the session is absent, revoked, or passively expired
    /// (spec.md §4.8 states `Active -> Expired` is passive, observed on
    /// read).
    pub fn is_revoked(&self, session_id: &EntityId) -> bool {
        match self.lookup(session_id) {
            Some(session) => !session.is_usable(self.clock.now()),
            None => true,
        }
    }

    pub fn touch(&self, session_id: &EntityId) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            session.last_seen = self.clock.now();
        }
    }
}

/// Bridges the `SessionStore`'s own `EntityId`-keyed, synchronous API to the
/// `str`-keyed, async `SessionLookup` port `credential-verifier` calls
/// against bearer sessions. Implemented here (not as a wrapper type in the
/// gateway composition root) since `SessionStore` is this crate's own type.
#[async_trait]
impl SessionLookup for SessionStore {
    async fn is_revoked(&self, session_id: &str) -> bool {
        self.is_revoked(&EntityId::from(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::FixedClock;

    fn store() -> (SessionStore, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::from_secs(1_000_000));
        (SessionStore::new(clock.clone()), clock)
    }

    #[tokio::test]
    async fn refresh_rotates_token_and_preserves_principal() {
        let (store, _clock) = store();
        let (session, r0) = store.create(EntityId::from("u1"), time::Duration::hours(1));
        let (refreshed, _r1) = store.refresh(&r0, time::Duration::hours(1)).await.unwrap();
        assert_eq!(refreshed.principal_id, session.principal_id);
        assert_ne!(refreshed.id, session.id);
        assert_eq!(refreshed.family_id, session.family_id);
    }

    #[tokio::test]
    async fn replaying_used_refresh_token_revokes_family() {
        let (store, _clock) = store();
        let (session, r0) = store.create(EntityId::from("u1"), time::Duration::hours(1));
        let (refreshed, _r1) = store.refresh(&r0, time::Duration::hours(1)).await.unwrap();

        let replay = store.refresh(&r0, time::Duration::hours(1)).await;
        assert!(matches!(replay, Err(SessionStoreError::ReplayDetected)));

        assert!(store.is_revoked(&session.id));
        assert!(store.is_revoked(&refreshed.id));
    }

    #[tokio::test]
    async fn expired_session_reports_revoked_on_lookup() {
        let (store, clock) = store();
        let (session, _r0) = store.create(EntityId::from("u1"), time::Duration::minutes(5));
        clock.advance_secs(301);
        assert!(store.is_revoked(&session.id));
    }

    #[tokio::test]
    async fn explicit_revoke_does_not_affect_other_family_members_retroactively() {
        let (store, _clock) = store();
        let (session, _r0) = store.create(EntityId::from("u1"), time::Duration::hours(1));
        store.revoke(&session.id);
        assert!(store.is_revoked(&session.id));
    }
}
