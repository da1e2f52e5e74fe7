mod builder;
mod convergence;
mod trainer;

pub use builder::TrainerBuilder;
pub use convergence::{Convergence, Decision, DegeneratePolicy, StopReason};
pub use trainer::{Trained, Trainer};
