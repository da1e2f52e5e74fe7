use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

/// The result type used in the entire movielens module.
pub type Result<T> = std::result::Result<T, DataErr>;

/// The movielens module's error type.
#[derive(Debug)]
pub enum DataErr {
    /// A file could not be opened or read.
    Io { path: PathBuf, source: io::Error },
    /// The delimited reader failed before a row could be inspected.
    Csv { path: PathBuf, source: csv::Error },
    /// A row has the wrong amount of fields or an unparsable value.
    Malformed {
        path: PathBuf,
        line: u64,
        reason: String,
    },
    /// A `DataConfig` could not be deserialized.
    Config(serde_json::Error),
}

impl Display for DataErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataErr::Io { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            DataErr::Csv { path, source } => {
                write!(f, "cannot parse '{}': {source}", path.display())
            }
            DataErr::Malformed { path, line, reason } => {
                write!(f, "malformed row at {}:{line}: {reason}", path.display())
            }
            DataErr::Config(e) => write!(f, "invalid data config: {e}"),
        }
    }
}

impl Error for DataErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataErr::Io { source, .. } => Some(source),
            DataErr::Csv { source, .. } => Some(source),
            DataErr::Malformed { .. } => None,
            DataErr::Config(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for DataErr {
    fn from(e: serde_json::Error) -> Self {
        DataErr::Config(e)
    }
}
