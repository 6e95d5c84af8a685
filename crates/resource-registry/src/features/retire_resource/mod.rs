pub mod error;
pub mod use_case;

pub use error::RetireResourceError;
pub use use_case::RetireResourceUseCase;
