pub mod assumptions;
pub mod currency;
pub mod deal;
pub mod depreciation;
pub mod error;
pub mod evaluation;
pub mod fees;
pub mod input;
pub mod projection;
pub mod summary;
pub mod time_value;
pub mod types;
pub mod variants;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

#[cfg(feature = "sink")]
pub mod sink;

pub use error::RealtyModelError;
pub use types::*;

/// Standard result type for all realty-model operations
pub type RealtyModelResult<T> = Result<T, RealtyModelError>;
