//! Composition Root — the one place concrete adapters are instantiated
//! and wired into the `AuthorizationPipeline` (spec.md §4.5). Mirrors the
//! teacher's `CompositionRoot::production` pattern: a single factory
//! method that returns everything Axum handlers need, built from generics
//! rather than trait objects since this binary only ever assembles one
//! concrete collaborator stack.

use crate::config::{parse_algorithm, Config};
use crate::state::{AppState, GatewayPipeline};
use audit_recorder::{AuditFilter, AuditRecorder};
use authz_pipeline::AuthorizationPipeline;
use credential_verifier::{CredentialVerifier, InMemoryApiKeyRegistry};
use decision_cache::DecisionCache;
use jsonwebtoken::DecodingKey;
use kernel::{Clock, SystemClock};
use policy_engine::{CorpusSnapshot, PolicyCorpus, PolicyEngine};
use policy_engine::kinds::{MfaRequiredPolicy, RolePolicy, SensitivityTierPolicy, TeamIntersectionPolicy};
use resource_registry::{InMemoryCapabilityCache, InMemoryResourceRepository, StaticProtocolAdapter};
use session_store::SessionStore;
use siem_forwarder::{HttpSinkAdapter, SiemForwarder, SinkConfig};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Everything `main` needs after composition: the Axum state plus the
/// SIEM forwarder handle the tailer task and graceful shutdown share.
pub struct CompositionRoot {
    pub app_state: AppState,
    pub siem_forwarder: Arc<SiemForwarder>,
    pub clock: Arc<dyn Clock>,
}

impl CompositionRoot {
    pub fn production(config: &Config) -> Self {
        info!("composing authorization gateway");
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let sessions = Arc::new(SessionStore::new(clock.clone()));
        let api_keys = Arc::new(InMemoryApiKeyRegistry::new());

        let decoding_key = DecodingKey::from_secret(config.credential.jwt_secret.as_bytes());
        let algorithm = parse_algorithm(&config.credential.jwt_algorithm).expect("config.validate() rejects an unrecognized jwt_algorithm before this runs");
        let credential_verifier = Arc::new(CredentialVerifier::new(decoding_key, algorithm, sessions.clone(), api_keys, clock.clone()));

        let resources = Arc::new(InMemoryResourceRepository::new());
        let capability_cache = Arc::new(InMemoryCapabilityCache::new());
        let protocol_adapter = Arc::new(StaticProtocolAdapter::new());

        let decision_cache = Arc::new(DecisionCache::new(clock.clone()));
        let policy_engine = Arc::new(PolicyEngine::new(Arc::new(default_corpus()), clock.clone()));

        let audit = Arc::new(AuditRecorder::new());

        let pipeline: GatewayPipeline = AuthorizationPipeline::new(
            credential_verifier,
            resources,
            capability_cache,
            protocol_adapter,
            decision_cache,
            policy_engine,
            audit.clone(),
            clock.clone(),
        );

        let siem_forwarder = Arc::new(SiemForwarder::new(audit.clone(), clock.clone()));
        let mut sink_ids = Vec::new();
        for sink in &config.siem.sinks {
            let adapter = Arc::new(HttpSinkAdapter::new(sink.endpoint.clone(), sink.auth_header.clone(), sink.max_payload_size));
            siem_forwarder.register_sink(sink.id.clone(), adapter, SinkConfig::default());
            sink_ids.push(sink.id.clone());
        }
        spawn_siem_tailer(audit.clone(), siem_forwarder.clone(), sink_ids);

        info!("composition complete");

        Self {
            app_state: AppState {
                pipeline: Arc::new(pipeline),
                audit,
                sessions,
                clock: clock.clone(),
            },
            siem_forwarder,
            clock,
        }
    }
}

/// Built-in policy corpus (spec.md §4.2 kinds), version 1. A real
/// deployment hot-reloads this from the labeled rule-file directory spec.md
/// §6 describes; this gateway ships only the in-process default corpus, as
/// no corpus-file format or loader is specified (spec.md §1 Non-goals).
fn default_corpus() -> PolicyCorpus {
    let policies: Vec<Arc<dyn policy_engine::Policy>> = vec![
        Arc::new(RolePolicy::new(BTreeSet::new(), BTreeSet::new())),
        Arc::new(TeamIntersectionPolicy),
        Arc::new(SensitivityTierPolicy::new("admin", "viewer", BTreeSet::from(["developer".to_string()]), time::Duration::hours(1))),
        Arc::new(MfaRequiredPolicy::new(time::Duration::hours(1))),
    ];
    PolicyCorpus::new(CorpusSnapshot::new(1, policies))
}

/// Tails newly-enqueued audit records into every registered SIEM sink and
/// drives each sink's batch shipment loop. The `SiemForwarder` queue is
/// push-based (spec.md §4.7) while the `AuditRecorder` is a pull-based
/// store, so this task is the bridge between the two: it re-scans for
/// unforwarded records (`siem_forwarded_at.is_none()`) on a fixed tick
/// rather than being notified, trading a little latency for not needing a
/// new event-bus topic the spec never names.
fn spawn_siem_tailer(audit: Arc<AuditRecorder>, forwarder: Arc<SiemForwarder>, sink_ids: Vec<String>) {
    if sink_ids.is_empty() {
        return;
    }
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(2));
        loop {
            ticker.tick().await;

            let mut cursor = None;
            loop {
                let page = audit.query(&AuditFilter::default(), cursor, 500);
                let exhausted = page.next_cursor.is_none();
                for record in &page.records {
                    if record.siem_forwarded_at.is_some() {
                        continue;
                    }
                    for sink_id in &sink_ids {
                        let _ = forwarder.enqueue(sink_id, record.clone());
                    }
                }
                cursor = page.next_cursor;
                if exhausted {
                    break;
                }
            }

            for sink_id in &sink_ids {
                loop {
                    match forwarder.ship_batch(sink_id).await {
                        Ok(siem_forwarder::BatchOutcome::Empty) | Ok(siem_forwarder::BatchOutcome::CircuitOpen) | Err(_) => break,
                        Ok(_) => continue,
                    }
                }
            }
        }
    });
}
