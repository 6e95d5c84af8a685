//! Authorization Pipeline: the orchestrator composing credential
//! verification, resource/capability resolution, the decision cache, the
//! policy engine and the audit recorder into a single `authorize` call
//! (spec.md §4.5).

pub mod dto;
pub mod pipeline;

pub use dto::{AuthorizeRequest, Credential};
pub use pipeline::AuthorizationPipeline;
