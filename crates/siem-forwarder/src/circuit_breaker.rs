//! Per-sink circuit breaker, generalized from the teacher's consensus-layer
//! `CircuitBreaker` (peer-health breaker for RPC calls) to a record-shipping
//! breaker with a doubling reopen cooldown. Swaps `prometheus` for this
//! workspace's `metrics` facade and `Instant`/real time for the injected
//! `kernel::Clock`, so trip/reopen timing stays test-hermetic.

use kernel::Clock;
use metrics::gauge;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct CircuitConfig {
    /// Consecutive failed batches before the circuit opens (spec default 10).
    pub failure_threshold: usize,
    /// Cooldown before `Open` admits a probe (spec default 30s).
    pub cooldown: Duration,
    /// Cap on the doubling cooldown after repeated reopens (spec: 5 min).
    pub max_cooldown: Duration,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 10,
            cooldown: Duration::from_secs(30),
            max_cooldown: Duration::from_secs(300),
        }
    }
}

struct StateData {
    state: CircuitState,
    failure_count: usize,
    current_cooldown: Duration,
    opened_at: Option<time::OffsetDateTime>,
    probe_in_flight: bool,
}

pub struct CircuitBreaker {
    sink_id: String,
    config: CircuitConfig,
    clock: Arc<dyn Clock>,
    state: RwLock<StateData>,
}

impl CircuitBreaker {
    pub fn new(sink_id: impl Into<String>, config: CircuitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            sink_id: sink_id.into(),
            config,
            clock,
            state: RwLock::new(StateData {
                state: CircuitState::Closed,
                failure_count: 0,
                current_cooldown: Duration::from_secs(0),
                opened_at: None,
                probe_in_flight: false,
            }),
        }
    }

    pub fn state(&self) -> CircuitState {
        self.state.read().state
    }

    /// Whether a batch may be attempted right now. `HalfOpen` admits exactly
    /// one probe at a time; concurrent callers after the first are refused
    /// until that probe resolves.
    pub fn try_acquire(&self) -> bool {
        let mut s = self.state.write();
        match s.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed = s
                    .opened_at
                    .map(|opened| self.clock.now() - opened)
                    .unwrap_or_default();
                if elapsed >= time_duration(s.current_cooldown) {
                    s.state = CircuitState::HalfOpen;
                    s.probe_in_flight = true;
                    gauge!("authz_gateway_siem_circuit_state", "sink" => self.sink_id.clone()).set(circuit_state_gauge(CircuitState::HalfOpen));
                    debug!(sink = %self.sink_id, "circuit half-open, admitting probe");
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if s.probe_in_flight {
                    false
                } else {
                    s.probe_in_flight = true;
                    true
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut s = self.state.write();
        match s.state {
            CircuitState::Closed => {
                s.failure_count = 0;
            }
            CircuitState::HalfOpen => {
                s.state = CircuitState::Closed;
                s.failure_count = 0;
                s.current_cooldown = Duration::from_secs(0);
                s.opened_at = None;
                s.probe_in_flight = false;
                gauge!("authz_gateway_siem_circuit_state", "sink" => self.sink_id.clone()).set(circuit_state_gauge(CircuitState::Closed));
                debug!(sink = %self.sink_id, "circuit closed after successful probe");
            }
            CircuitState::Open => {}
        }
    }

    pub fn record_failure(&self) {
        let mut s = self.state.write();
        match s.state {
            CircuitState::Closed => {
                s.failure_count += 1;
                if s.failure_count >= self.config.failure_threshold {
                    self.open(&mut s, self.config.cooldown);
                }
            }
            CircuitState::HalfOpen => {
                let doubled = (s.current_cooldown * 2).min(self.config.max_cooldown);
                let next = if doubled.is_zero() { self.config.cooldown } else { doubled };
                self.open(&mut s, next);
            }
            CircuitState::Open => {}
        }
    }

    fn open(&self, s: &mut StateData, cooldown: Duration) {
        s.state = CircuitState::Open;
        s.failure_count = 0;
        s.current_cooldown = cooldown;
        s.opened_at = Some(self.clock.now());
        s.probe_in_flight = false;
        gauge!("authz_gateway_siem_circuit_state", "sink" => self.sink_id.clone()).set(circuit_state_gauge(CircuitState::Open));
        debug!(sink = %self.sink_id, cooldown_secs = cooldown.as_secs(), "circuit open");
    }
}

fn time_duration(d: Duration) -> time::Duration {
    time::Duration::try_from(d).unwrap_or(time::Duration::ZERO)
}

/// Numeric projection of `CircuitState` for the `authz_gateway_siem_circuit_state`
/// gauge (0=closed, 1=half-open, 2=open), mirroring the teacher's peer-health
/// gauge encoding in the consensus-layer circuit breaker.
fn circuit_state_gauge(state: CircuitState) -> f64 {
    match state {
        CircuitState::Closed => 0.0,
        CircuitState::HalfOpen => 1.0,
        CircuitState::Open => 2.0,
    }
}
