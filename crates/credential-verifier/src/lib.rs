//! Credential Verifier: turns bearer tokens, API keys, and agent tokens
//! into `Principal`s (spec.md §4.1).

pub mod claims;
pub mod in_memory_registry;
pub mod ports;
pub mod verifier;

pub use claims::BearerClaims;
pub use in_memory_registry::InMemoryApiKeyRegistry;
pub use ports::{ApiKeyRecord, ApiKeyRegistry, NoOpRateLimiter, RateLimiter, SessionLookup};
pub use verifier::{CredentialVerifier, CLOCK_SKEW_TOLERANCE_SECS};
