use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{DataErr, Result};

pub const DATA_FILE: &str = "data.txt";
pub const TRAIN_FILE: &str = "train.txt";
pub const TEST_FILE: &str = "test.txt";
pub const MOVIES_FILE: &str = "movies.txt";

/// Where every dataset file lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Every rating, train and test together.
    pub data_path: PathBuf,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    /// Movie titles and genre flags.
    pub movies_path: PathBuf,
}

impl DataConfig {
    /// Returns a new `DataConfig` pointing at the usual file names inside `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();

        Self {
            data_path: dir.join(DATA_FILE),
            train_path: dir.join(TRAIN_FILE),
            test_path: dir.join(TEST_FILE),
            movies_path: dir.join(MOVIES_FILE),
        }
    }

    /// Loads a `DataConfig` from a JSON file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read and `Config` if it is not a valid config.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DataErr::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::from_dir("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dir_uses_the_usual_names() {
        let config = DataConfig::from_dir("/tmp/ml");

        assert_eq!(config.data_path, Path::new("/tmp/ml/data.txt"));
        assert_eq!(config.train_path, Path::new("/tmp/ml/train.txt"));
        assert_eq!(config.test_path, Path::new("/tmp/ml/test.txt"));
        assert_eq!(config.movies_path, Path::new("/tmp/ml/movies.txt"));
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "data_path": "a/data.txt",
            "train_path": "a/train.txt",
            "test_path": "b/test.txt",
            "movies_path": "c/movies.txt"
        }"#;

        let config: DataConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.test_path, Path::new("b/test.txt"));
        assert_eq!(config.movies_path, Path::new("c/movies.txt"));
    }

    #[test]
    fn missing_json_file_is_an_io_error() {
        let err = DataConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, DataErr::Io { .. }));
    }
}
