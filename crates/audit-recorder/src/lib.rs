pub mod error;
pub mod filter;
pub mod record;
pub mod recorder;

pub use error::{AuditRecorderError, Result};
pub use filter::{AuditFilter, Cursor, Page};
pub use record::{AuditRecord, RecordIdGenerator};
pub use recorder::AuditRecorder;
