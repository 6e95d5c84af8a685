pub mod error;
pub mod use_case;

pub use error::ListResourcesError;
pub use use_case::ListResourcesUseCase;
