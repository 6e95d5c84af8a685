//! The `Policy` trait — one labeled layer of the AND-composed corpus.
//!
//! spec §9 "Dynamic dispatch over kinds": each built-in policy kind is a
//! concrete type behind this trait; the corpus holds a
//! `Vec<Arc<dyn Policy>>` registered through a kind-tag → constructor map
//! (see `kinds::registry`).

use crate::verdict::PolicyVerdict;
use kernel::{AuthInput, Clock};

pub trait Policy: Send + Sync {
    /// Stable label identifying this policy in `Decision.policies_evaluated`.
    fn label(&self) -> &str;

    /// Rules may read wall-clock time only through `clock` (spec §4.2/§9).
    fn evaluate(&self, input: &AuthInput, clock: &dyn Clock) -> PolicyVerdict;
}
