pub mod error;
pub mod use_case;

pub use error::GetResourceError;
pub use use_case::GetResourceUseCase;
