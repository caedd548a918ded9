//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use repodata_schemas::{LoaderError, ValidationError, ValidationErrors};
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A document failed validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Several documents failed validation
    #[error("{} document(s) failed validation", .0.len())]
    ValidationBatch(ValidationErrors),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The document kind couldn't be told from the file name
    #[error("Can't tell which document {} is; pass --kind", path.display())]
    UndetectableKind { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Validation(_) | Self::ValidationBatch(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::UndetectableKind { .. } => 4,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_) | Self::UndetectableKind { .. })
    }
}

impl From<LoaderError> for Error {
    fn from(error: LoaderError) -> Self {
        match error {
            LoaderError::IoError { path, source } if source.kind() == io::ErrorKind::NotFound => {
                Self::FileNotFound { path }
            }
            LoaderError::IoError { path, source } => Self::Io(io::Error::new(
                source.kind(),
                format!("{}: {}", path.display(), source),
            )),
            LoaderError::UnknownEncoding { label, .. } => {
                Self::invalid_args(format!("unknown encoding '{}'", label))
            }
            LoaderError::UndetectableKind { path } => Self::UndetectableKind { path },
            LoaderError::Validation(error) => Self::Validation(error),
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repodata_schemas::{ErrorKind, ValidationContext};
    use std::path::Path;

    #[test]
    fn test_exit_codes() {
        let validation = ValidationError::ordering(&ValidationContext::new(), "Keys must be sorted");
        assert_eq!(Error::from(validation).exit_code(), 2);
        assert_eq!(Error::config("bad").exit_code(), 5);
        assert_eq!(Error::invalid_args("bad").exit_code(), 6);
        assert_eq!(Error::other("bad").exit_code(), 99);
    }

    #[test]
    fn test_loader_errors_map_to_categories() {
        let missing = LoaderError::io_error(
            Path::new("people.yaml"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(Error::from(missing), Error::FileNotFound { .. }));

        let denied = LoaderError::io_error(
            Path::new("people.yaml"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let error = Error::from(denied);
        assert_eq!(error.exit_code(), 1);
        assert!(error.to_string().contains("people.yaml"));

        let undetectable = Error::from(LoaderError::undetectable_kind(Path::new("teams.yaml")));
        assert_eq!(undetectable.exit_code(), 4);
        assert!(undetectable.should_show_help());

        let encoding = Error::from(LoaderError::unknown_encoding("klingon", Path::new("x.csv")));
        assert_eq!(encoding.exit_code(), 6);
    }

    #[test]
    fn test_validation_error_display_passes_through() {
        let error = ValidationError::new(ErrorKind::Format, "$.bug.color", "Rule 'color' violated")
            .in_document("labels.yaml");
        let cli_error = Error::from(error);
        assert_eq!(
            format_error(&cli_error, false),
            "Error: Format error in 'labels.yaml' at '$.bug.color': Rule 'color' violated"
        );
    }
}
