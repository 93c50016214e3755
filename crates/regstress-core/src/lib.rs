pub mod error;
pub mod model;
pub mod types;

#[cfg(feature = "regulatory")]
pub mod regulatory;

#[cfg(feature = "stress")]
pub mod stress;

#[cfg(feature = "impact")]
pub mod impact;

pub use error::RegStressError;
pub use types::*;

/// Standard result type for all regstress operations
pub type RegStressResult<T> = Result<T, RegStressError>;
