//! Policy Engine: evaluates an `AuthInput` against a hot-reloadable corpus
//! of AND-composed policies and produces a `Decision`.
//!
//! Policies never touch wall-clock time directly — every kind receives the
//! injected `kernel::Clock` so evaluation stays deterministic under test
//! and replay.

pub mod corpus;
pub mod engine;
pub mod error;
pub mod kinds;
pub mod policy;
pub mod verdict;

pub use corpus::{CorpusSnapshot, PolicyCorpus};
pub use engine::{PolicyEngine, DEFAULT_DEADLINE};
pub use error::{PolicyEngineError, Result};
pub use policy::Policy;
pub use verdict::PolicyVerdict;
