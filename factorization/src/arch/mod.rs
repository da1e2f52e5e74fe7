pub mod biased;
mod model;
pub mod plain;

pub use biased::BiasedFactorization;
pub use model::{Factorization, check_bounds, loss};
pub use plain::PlainFactorization;
