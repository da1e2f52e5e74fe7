use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire projection module.
pub type Result<T> = std::result::Result<T, ProjectionErr>;

/// The projection module's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionErr {
    /// The item matrix has less than two singular vectors to project onto.
    TooFewComponents { got: usize },
    /// The singular value decomposition failed, or the matrix holds non-finite values.
    Decomposition,
    /// A row to plot is not in the projected matrix.
    IndexOutOfRange { index: usize, bound: usize },
    /// The plot could not be drawn or written.
    Plot(String),
}

impl Display for ProjectionErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionErr::TooFewComponents { got } => {
                write!(f, "need at least 2 components to project onto, got {got}")
            }
            ProjectionErr::Decomposition => write!(f, "the singular value decomposition failed"),
            ProjectionErr::IndexOutOfRange { index, bound } => {
                write!(f, "row {index} is out of range, there are {bound} rows")
            }
            ProjectionErr::Plot(e) => write!(f, "cannot draw plot: {e}"),
        }
    }
}

impl Error for ProjectionErr {}
