pub mod error;
pub mod plot;
pub mod svd;

pub use error::{ProjectionErr, Result};
pub use plot::{plot, plot_projection};
pub use svd::project;
