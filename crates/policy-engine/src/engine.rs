//! `PolicyEngine` — evaluates an `AuthInput` against the live
//! `PolicyCorpus` snapshot under a deadline (spec §4.2: default 50ms,
//! deny-on-timeout; "decline ≠ deny"; AND-composition across every policy
//! that doesn't decline).

use crate::corpus::PolicyCorpus;
use crate::error::{PolicyEngineError, Result};
use crate::verdict::PolicyVerdict;
use kernel::{redact, AuthInput, Clock, Decision};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(50);

pub struct PolicyEngine {
    corpus: Arc<PolicyCorpus>,
    clock: Arc<dyn Clock>,
    deadline: Duration,
}

impl PolicyEngine {
    pub fn new(corpus: Arc<PolicyCorpus>, clock: Arc<dyn Clock>) -> Self {
        Self {
            corpus,
            clock,
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    #[instrument(skip_all, fields(action = %input.action))]
    pub async fn evaluate(&self, input: &AuthInput) -> Result<Decision> {
        let corpus = self.corpus.load();
        let clock = Arc::clone(&self.clock);
        let snapshot_policies = corpus.policies.clone();
        let input = input.clone();

        let evaluated = tokio::time::timeout(
            self.deadline,
            tokio::task::spawn_blocking(move || evaluate_sync(&snapshot_policies, &input, clock.as_ref())),
        )
        .await;

        match evaluated {
            Ok(Ok(decision)) => Ok(decision),
            Ok(Err(join_error)) => Err(PolicyEngineError::EvaluationError(join_error.to_string())),
            Err(_elapsed) => {
                tracing::warn!(deadline_ms = self.deadline.as_millis() as u64, "policy evaluation timed out");
                Ok(Decision::deny_uncached("evaluation timed out", self.clock.now()))
            }
        }
    }

    /// Evaluates a batch, preserving input order in the output.
    pub async fn evaluate_batch(&self, inputs: &[AuthInput]) -> Result<Vec<Decision>> {
        let mut decisions = Vec::with_capacity(inputs.len());
        for input in inputs {
            decisions.push(self.evaluate(input).await?);
        }
        Ok(decisions)
    }

    pub fn corpus_version(&self) -> u64 {
        self.corpus.version()
    }
}

fn evaluate_sync(policies: &[Arc<dyn crate::policy::Policy>], input: &AuthInput, clock: &dyn Clock) -> Decision {
    let mut allow_codes = Vec::new();
    let mut labels_evaluated = Vec::new();

    for policy in policies {
        let verdict = policy.evaluate(input, clock);
        labels_evaluated.push(policy.label().to_string());
        match verdict {
            PolicyVerdict::Deny(reason) => {
                return Decision::deny(reason, labels_evaluated, clock.now(), Duration::from_secs(0));
            }
            PolicyVerdict::Allow(code) => allow_codes.push(code),
            PolicyVerdict::Decline => {}
        }
    }

    if allow_codes.is_empty() {
        // Deny-closed default: a corpus with nothing to say about this
        // request grants nothing (spec §4.2 "no implicit allow").
        return Decision::deny("no applicable policy granted access", labels_evaluated, clock.now(), Duration::from_secs(0));
    }

    let reason = allow_codes.join("+");
    let sensitivity = input.effective_sensitivity();
    let sensitive_keys = input
        .capability
        .as_ref()
        .map(|c| c.sensitive_parameter_keys.clone())
        .unwrap_or_default();
    let filtered = redact(&input.parameters, &sensitive_keys);

    Decision::allow(reason, filtered, labels_evaluated, clock.now(), sensitivity.cache_ttl())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusSnapshot;
    use crate::kinds::{RolePolicy, TeamIntersectionPolicy};
    use kernel::{FixedClock, Principal, PrincipalKind, RequestContext, Resource};
    use std::collections::{BTreeMap, BTreeSet};

    fn engine(policies: Vec<Arc<dyn crate::policy::Policy>>, clock: Arc<dyn Clock>) -> PolicyEngine {
        let corpus = Arc::new(PolicyCorpus::new(CorpusSnapshot::new(1, policies)));
        PolicyEngine::new(corpus, clock)
    }

    fn input() -> AuthInput {
        AuthInput {
            action: "tool:invoke".into(),
            principal: Principal::new("u1", "u", PrincipalKind::User)
                .with_team("t1")
                .with_role("developer"),
            resource: Some(Resource::new("r1", "r1", "mcp").with_authorized_team("t1")),
            capability: None,
            parameters: BTreeMap::new(),
            context: RequestContext::new("req-1", time::OffsetDateTime::UNIX_EPOCH),
        }
    }

    #[tokio::test]
    async fn composes_allow_reasons_in_policy_order() {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::from_secs(0));
        let policies: Vec<Arc<dyn crate::policy::Policy>> = vec![
            Arc::new(TeamIntersectionPolicy),
            Arc::new(RolePolicy::new(BTreeSet::new(), BTreeSet::new())),
        ];
        let engine = engine(policies, clock);
        let decision = engine.evaluate(&input()).await.unwrap();
        assert!(decision.allow);
        assert_eq!(decision.reason, "team+role");
    }

    #[tokio::test]
    async fn denies_closed_when_nothing_opines() {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::from_secs(0));
        let engine = engine(vec![], clock);
        let mut unrelated = input();
        unrelated.resource = None;
        let decision = engine.evaluate(&unrelated).await.unwrap();
        assert!(!decision.allow);
    }
}
