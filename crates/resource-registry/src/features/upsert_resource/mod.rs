pub mod dto;
pub mod error;
pub mod use_case;

pub use dto::{ResourceView, UpsertResourceCommand};
pub use error::UpsertResourceError;
pub use use_case::UpsertResourceUseCase;
