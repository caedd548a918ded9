//! Error types for document loading operations
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::ValidationError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors raised while reading and validating document files
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Encoding label not known to the decoder
    #[error("Unknown text encoding '{label}' for '{path}'")]
    UnknownEncoding { label: String, path: PathBuf },

    /// File name doesn't say which document it is
    #[error("Can't tell which document '{path}' is. Expected people, orgs, labels or a .csv export")]
    UndetectableKind { path: PathBuf },

    /// The document was read but failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl LoaderError {
    /// Create an I/O error with path context
    pub fn io_error(path: &Path, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.to_path_buf(),
            source: error,
        }
    }

    /// Create an unknown encoding error
    pub fn unknown_encoding(label: &str, path: &Path) -> Self {
        Self::UnknownEncoding {
            label: label.to_string(),
            path: path.to_path_buf(),
        }
    }

    /// Create an undetectable kind error
    pub fn undetectable_kind(path: &Path) -> Self {
        Self::UndetectableKind {
            path: path.to_path_buf(),
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::IoError { path, .. } => Some(path),
            Self::UnknownEncoding { path, .. } => Some(path),
            Self::UndetectableKind { path } => Some(path),
            Self::Validation(_) => None,
        }
    }

    /// The validation failure, when the file itself was readable
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::error::ErrorKind;

    #[test]
    fn test_error_creation() {
        let path = Path::new("/data/people.yaml");
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error = LoaderError::io_error(path, io_err);

        assert!(matches!(error, LoaderError::IoError { .. }));
        assert_eq!(error.path(), Some(path));
        assert!(error.to_string().contains("/data/people.yaml"));
    }

    #[test]
    fn test_validation_is_transparent() {
        let inner = ValidationError::new(ErrorKind::Ordering, "$", "out of order");
        let error: LoaderError = inner.into();

        assert_eq!(error.to_string(), "Ordering error at '$': out of order");
        assert!(error.path().is_none());
        assert_eq!(error.as_validation().map(|e| e.kind), Some(ErrorKind::Ordering));
    }
}
