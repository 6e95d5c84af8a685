pub mod error;
pub mod use_case;

pub use error::GetCapabilityError;
pub use use_case::GetCapabilityUseCase;
