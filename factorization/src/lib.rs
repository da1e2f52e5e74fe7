pub mod arch;
pub mod error;
pub mod optimization;
pub mod rating;
pub mod training;

pub use error::{FactorizationErr, Result};
pub use rating::Rating;
