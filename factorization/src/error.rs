use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire factorization module.
pub type Result<T> = std::result::Result<T, FactorizationErr>;

/// The factorization module's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum FactorizationErr {
    /// A matrix dimension that must be positive is zero.
    InvalidDimension { what: &'static str, got: usize },
    /// A rating references a user or item outside of the model.
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        bound: usize,
    },
    /// The first epoch did not decrease the loss, so the stopping ratio is undefined.
    DegenerateConvergence { init_drop: f64 },
    /// A hyperparameter is not a finite, non-negative number.
    InvalidHyperparameter { name: &'static str, value: f64 },
}

impl Display for FactorizationErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorizationErr::InvalidDimension { what, got } => {
                write!(f, "invalid dimension for {what}: got {got}, expected a positive size")
            }
            FactorizationErr::IndexOutOfRange { what, index, bound } => {
                write!(f, "{what} index {index} is out of range, the model has {bound}")
            }
            FactorizationErr::DegenerateConvergence { init_drop } => write!(
                f,
                "the first epoch changed the loss by {init_drop}, the stopping ratio is undefined"
            ),
            FactorizationErr::InvalidHyperparameter { name, value } => {
                write!(f, "invalid value for {name}: {value}")
            }
        }
    }
}

impl Error for FactorizationErr {}
