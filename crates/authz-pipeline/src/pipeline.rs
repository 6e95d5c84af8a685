//! Authorization pipeline (spec.md §4.5): credential verification → resource
//! and capability resolution → cache lookup → policy evaluation → audit →
//! decision. Generalized from the teacher's `EvaluatePermissionsUseCase`
//! (which composes cache/logger/metrics around an IAM+SCP evaluation pair)
//! into a composition of C1, C4, C3, C2, C6.

use crate::dto::{AuthorizeRequest, Credential};
use audit_recorder::{AuditRecord, AuditRecorder, RecordIdGenerator};
use credential_verifier::{ApiKeyRegistry, CredentialVerifier, SessionLookup};
use decision_cache::{fingerprint, CacheLookup, DecisionCache, Fingerprint};
use kernel::{AuthInput, Clock, Decision, EntityId, ErrorKind, Principal, PrincipalKind};
use policy_engine::PolicyEngine;
use resource_registry::{CapabilityCache, GetCapabilityUseCase, ProtocolAdapter, ResourceRepository};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{instrument, warn};

/// Sentinel principal id recorded on an audit entry when C1 rejects the
/// credential outright — `AuditRecord.principal_id` is non-optional (spec.md
/// §3's record shape), so there is no principal to name.
const ANONYMOUS_PRINCIPAL_ID: &str = "anonymous";

pub struct AuthorizationPipeline<S, A, R, Cap, PA>
where
    S: SessionLookup,
    A: ApiKeyRegistry,
    R: ResourceRepository,
    Cap: CapabilityCache,
    PA: ProtocolAdapter,
{
    credential_verifier: Arc<CredentialVerifier<S, A>>,
    resource_repository: Arc<R>,
    get_capability: GetCapabilityUseCase<R, Cap, PA>,
    decision_cache: Arc<DecisionCache>,
    policy_engine: Arc<PolicyEngine>,
    audit: Arc<AuditRecorder>,
    record_ids: RecordIdGenerator,
    clock: Arc<dyn Clock>,
}

impl<S, A, R, Cap, PA> AuthorizationPipeline<S, A, R, Cap, PA>
where
    S: SessionLookup + 'static,
    A: ApiKeyRegistry + 'static,
    R: ResourceRepository + 'static,
    Cap: CapabilityCache + 'static,
    PA: ProtocolAdapter + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        credential_verifier: Arc<CredentialVerifier<S, A>>,
        resource_repository: Arc<R>,
        capability_cache: Arc<Cap>,
        protocol_adapter: Arc<PA>,
        decision_cache: Arc<DecisionCache>,
        policy_engine: Arc<PolicyEngine>,
        audit: Arc<AuditRecorder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credential_verifier,
            get_capability: GetCapabilityUseCase::new(resource_repository.clone(), capability_cache, protocol_adapter),
            resource_repository,
            decision_cache,
            policy_engine,
            audit,
            record_ids: RecordIdGenerator::new(),
            clock,
        }
    }

    #[instrument(skip(self, credential, request), fields(action = %request.action))]
    pub async fn authorize(&self, credential: &Credential, request: AuthorizeRequest) -> Result<Decision, ErrorKind> {
        let start = Instant::now();

        let principal = match self.verify(credential).await {
            Ok(principal) => principal,
            Err(err) => {
                self.record_audit(None, &request, false, "unauthenticated", Vec::new(), start.elapsed())?;
                return Err(err);
            }
        };

        let (resource, capability) = match self.resolve_resource_and_capability(&request).await {
            Ok(pair) => pair,
            Err(err) => {
                self.record_audit(Some(&principal), &request, false, "not_found", Vec::new(), start.elapsed())?;
                return Err(err);
            }
        };

        let input = AuthInput {
            action: request.action.clone(),
            principal: principal.clone(),
            resource,
            capability,
            parameters: request.parameters.clone(),
            context: request.context.clone(),
        };

        let decision = self.decide(&input).await;

        self.record_audit(
            Some(&principal),
            &request,
            decision.allow,
            &decision.reason,
            decision.policies_evaluated.clone(),
            start.elapsed(),
        )?;

        Ok(decision)
    }

    /// Batch entry point (spec.md §4.5): dedupes by fingerprint, evaluates
    /// only the misses, and enqueues one audit record per *original* input,
    /// preserving input order in the returned decisions. Every request gets
    /// an audit record, including ones a shared credential failure, an
    /// unresolved resource, or a policy-engine error turns into a deny —
    /// partial success is expressed within the response rather than by
    /// aborting the whole batch (spec.md §6).
    pub async fn authorize_batch(&self, credential: &Credential, requests: Vec<AuthorizeRequest>) -> Result<Vec<Decision>, ErrorKind> {
        let start = Instant::now();

        let principal = match self.verify(credential).await {
            Ok(principal) => principal,
            Err(err) => {
                for request in &requests {
                    self.record_audit(None, request, false, "unauthenticated", Vec::new(), start.elapsed())?;
                }
                return Err(err);
            }
        };

        // Resolve each request independently: an unknown resource yields a
        // per-item NotFound decision rather than aborting the batch.
        let mut inputs: Vec<Option<AuthInput>> = Vec::with_capacity(requests.len());
        let mut decisions: Vec<Option<Decision>> = Vec::with_capacity(requests.len());
        for request in &requests {
            match self.resolve_resource_and_capability(request).await {
                Ok((resource, capability)) => {
                    inputs.push(Some(AuthInput {
                        action: request.action.clone(),
                        principal: principal.clone(),
                        resource,
                        capability,
                        parameters: request.parameters.clone(),
                        context: request.context.clone(),
                    }));
                    decisions.push(None);
                }
                Err(_) => {
                    inputs.push(None);
                    decisions.push(Some(Decision::deny_uncached("not_found", self.clock.now())));
                }
            }
        }

        // Emergency-override inputs always bypass the cache (spec.md §4.3)
        // and are evaluated individually, same as the single-request path.
        for (idx, slot) in inputs.iter().enumerate() {
            if decisions[idx].is_some() {
                continue;
            }
            let input = slot.as_ref().expect("unresolved slots already carry a decision");
            if input.context.has_emergency_override() {
                decisions[idx] = Some(self.evaluate_and_record_error(input).await);
            }
        }

        let corpus_version = self.policy_engine.corpus_version();
        let cacheable_idx: Vec<usize> = (0..inputs.len()).filter(|&i| decisions[i].is_none()).collect();
        let fingerprints: HashMap<usize, Fingerprint> = cacheable_idx
            .iter()
            .map(|&i| (i, fingerprint(inputs[i].as_ref().expect("cacheable slot is resolved"), corpus_version)))
            .collect();

        let mut unique_fps: Vec<Fingerprint> = Vec::new();
        for &idx in &cacheable_idx {
            let fp = fingerprints[&idx];
            if !unique_fps.contains(&fp) {
                unique_fps.push(fp);
            }
        }

        let lookups = self.decision_cache.get_batch(&unique_fps);
        let mut cache_resolved: HashMap<Fingerprint, Decision> = HashMap::new();
        let mut miss_fps = Vec::new();
        for (fp, lookup) in unique_fps.iter().zip(lookups.into_iter()) {
            match lookup {
                CacheLookup::Fresh(decision) => {
                    cache_resolved.insert(*fp, decision);
                }
                CacheLookup::Stale(decision) => {
                    if let Some(&idx) = cacheable_idx.iter().find(|&&i| fingerprints[&i] == *fp) {
                        self.spawn_revalidation(inputs[idx].clone().expect("cacheable slot is resolved"), *fp);
                    }
                    cache_resolved.insert(*fp, decision);
                }
                CacheLookup::Miss => miss_fps.push(*fp),
            }
        }

        if !miss_fps.is_empty() {
            // One representative input per missing fingerprint — later
            // duplicates of the same fingerprint reuse this evaluation.
            let miss_inputs: Vec<AuthInput> = miss_fps
                .iter()
                .map(|fp| {
                    let idx = cacheable_idx
                        .iter()
                        .find(|&&i| fingerprints[&i] == *fp)
                        .expect("miss fingerprint came from cacheable inputs");
                    inputs[*idx].clone().expect("cacheable slot is resolved")
                })
                .collect();

            match self.policy_engine.evaluate_batch(&miss_inputs).await {
                Ok(batch_decisions) => {
                    for ((fp, miss_input), decision) in miss_fps.iter().zip(miss_inputs.iter()).zip(batch_decisions.into_iter()) {
                        self.decision_cache.set(
                            *fp,
                            decision.clone(),
                            miss_input.principal.id.to_string(),
                            miss_input.resource.as_ref().map(|r| r.id.to_string()),
                            miss_input.effective_sensitivity(),
                        );
                        cache_resolved.insert(*fp, decision);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "policy engine returned an error for a batch miss, denying closed");
                    let reason = format!("evaluation_error: {e}");
                    for fp in &miss_fps {
                        cache_resolved.insert(*fp, Decision::deny_uncached(reason.clone(), self.clock.now()));
                    }
                }
            }
        }

        for &idx in &cacheable_idx {
            let fp = fingerprints[&idx];
            decisions[idx] = Some(cache_resolved.get(&fp).cloned().expect("every cacheable fingerprint resolved above"));
        }

        let decisions: Vec<Decision> = decisions.into_iter().map(|d| d.expect("every index resolved above")).collect();

        for (request, decision) in requests.iter().zip(decisions.iter()) {
            self.record_audit(
                Some(&principal),
                request,
                decision.allow,
                &decision.reason,
                decision.policies_evaluated.clone(),
                start.elapsed(),
            )?;
        }

        Ok(decisions)
    }

    async fn verify(&self, credential: &Credential) -> Result<Principal, ErrorKind> {
        match credential {
            Credential::Bearer(token) => self.credential_verifier.verify_bearer(token).await,
            Credential::ApiKey(key) => self.credential_verifier.verify_api_key(key).await,
            Credential::Agent(token) => self.credential_verifier.verify_agent(token).await,
        }
    }

    async fn resolve_resource_and_capability(
        &self,
        request: &AuthorizeRequest,
    ) -> Result<(Option<kernel::Resource>, Option<kernel::Capability>), ErrorKind> {
        let Some(resource_id) = &request.resource_id else {
            return Ok((None, None));
        };

        let resource = self
            .resource_repository
            .get(resource_id)
            .await
            .map_err(|e| ErrorKind::NotFound(e.to_string()))?;

        let capability = if let Some(name) = &request.capability_name {
            let capability = self
                .get_capability
                .execute(resource_id, name)
                .await
                .map_err(|e| ErrorKind::NotFound(e.to_string()))?;
            Some(capability)
        } else {
            None
        };

        Ok((Some(resource), capability))
    }

    /// Cache-then-evaluate (spec.md §4.5 steps 4-5). Emergency-override
    /// requests always bypass the cache — `fingerprint` is documented as
    /// pure and total but never meant to key an overridden decision.
    async fn decide(&self, input: &AuthInput) -> Decision {
        if input.context.has_emergency_override() {
            return self.evaluate_and_record_error(input).await;
        }

        let corpus_version = self.policy_engine.corpus_version();
        let fp = fingerprint(input, corpus_version);

        match self.decision_cache.get(fp) {
            CacheLookup::Fresh(decision) => decision,
            CacheLookup::Stale(decision) => {
                self.spawn_revalidation(input.clone(), fp);
                decision
            }
            CacheLookup::Miss => {
                let decision = self.evaluate_and_record_error(input).await;
                self.decision_cache.set(
                    fp,
                    decision.clone(),
                    input.principal.id.to_string(),
                    input.resource.as_ref().map(|r| r.id.to_string()),
                    input.effective_sensitivity(),
                );
                decision
            }
        }
    }

    async fn evaluate_and_record_error(&self, input: &AuthInput) -> Decision {
        match self.policy_engine.evaluate(input).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(error = %e, "policy engine returned an error, denying closed");
                Decision::deny_uncached(format!("evaluation_error: {e}"), self.clock.now())
            }
        }
    }

    fn spawn_revalidation(&self, input: AuthInput, fp: Fingerprint) {
        if !self.decision_cache.try_begin_revalidation(fp) {
            return;
        }
        let cache = self.decision_cache.clone();
        let engine = self.policy_engine.clone();
        let clock = self.clock.clone();
        tokio::spawn(async move {
            let decision = match engine.evaluate(&input).await {
                Ok(decision) => decision,
                Err(e) => Decision::deny_uncached(format!("evaluation_error: {e}"), clock.now()),
            };
            cache.set(
                fp,
                decision,
                input.principal.id.to_string(),
                input.resource.as_ref().map(|r| r.id.to_string()),
                input.effective_sensitivity(),
            );
            cache.finish_revalidation(fp);
        });
    }

    /// Builds and records the `AuditRecord` for this request, enqueuing
    /// before returning control to the caller (spec.md §4.5 step 6:
    /// at-least-once audit). A failure here aborts the request entirely —
    /// auditability is load-bearing.
    #[allow(clippy::too_many_arguments)]
    fn record_audit(
        &self,
        principal: Option<&Principal>,
        request: &AuthorizeRequest,
        allow: bool,
        reason: &str,
        policies_evaluated: Vec<String>,
        duration: Duration,
    ) -> Result<(), ErrorKind> {
        let record = AuditRecord {
            id: self.record_ids.next(),
            timestamp: self.clock.now(),
            principal_id: principal.map(|p| p.id.clone()).unwrap_or_else(|| EntityId::new(ANONYMOUS_PRINCIPAL_ID)),
            principal_kind: principal.map(|p| p.kind).unwrap_or(PrincipalKind::User),
            action: request.action.clone(),
            resource_id: request.resource_id.clone(),
            capability_id: request.capability_name.clone(),
            allow,
            reason: reason.to_string(),
            policies_evaluated,
            duration,
            client_ip: request.context.client_ip,
            request_id: request.context.request_id.clone(),
            siem_forwarded_at: None,
        };

        self.audit
            .record(record)
            .map_err(|e| ErrorKind::Internal(format!("audit enqueue failed: {e}")))
    }
}
