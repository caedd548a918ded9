//! Validation error types for people, orgs, labels and export documents
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::validation::base::ValidationContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Wrong shape: unknown or missing keys, wrong value types, no matching alternative
    Structural,
    /// An institution or champion that does not resolve
    Reference,
    /// Contradictory fields, or a mapping key given twice
    Consistency,
    /// Top-level keys out of sorted order
    Ordering,
    /// Malformed scalar: email, username, repository name, color, CSV header
    Format,
}

impl ErrorKind {
    /// Stable lowercase name, used in machine-readable output
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Structural => "structural",
            ErrorKind::Reference => "reference",
            ErrorKind::Consistency => "consistency",
            ErrorKind::Ordering => "ordering",
            ErrorKind::Format => "format",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Structural => "Structural",
            ErrorKind::Reference => "Reference",
            ErrorKind::Consistency => "Consistency",
            ErrorKind::Ordering => "Ordering",
            ErrorKind::Format => "Format",
        };
        f.write_str(label)
    }
}

/// A validation violation with detailed context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The validation rule that was violated
    pub rule: String,
    /// What was expected
    pub expected: String,
    /// What was actually found
    pub actual: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rule '{}' violated: expected {}, but found {}",
            self.rule, self.expected, self.actual
        )
    }
}

/// Validation failure carrying the document, key path and offending value
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub struct ValidationError {
    /// Failure category
    pub kind: ErrorKind,
    /// Name of the document being validated, when known
    pub document: Option<String>,
    /// Key path where the error occurred
    pub path: String,
    /// Human-readable error message
    pub message: String,
    /// Detailed schema violations
    pub schema_violations: Vec<Violation>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(document) => write!(
                f,
                "{} error in '{}' at '{}': {}",
                self.kind, document, self.path, self.message
            )?,
            None => write!(f, "{} error at '{}': {}", self.kind, self.path, self.message)?,
        }

        if !self.schema_violations.is_empty() {
            write!(f, "\nViolations:")?;
            for violation in &self.schema_violations {
                write!(f, "\n  - {}", violation)?;
            }
        }

        Ok(())
    }
}

impl ValidationError {
    /// Create a new validation error
    pub fn new<P, M>(kind: ErrorKind, path: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            kind,
            document: None,
            path: path.into(),
            message: message.into(),
            schema_violations: Vec::new(),
        }
    }

    /// Create a validation error with violations
    pub fn with_violations<P, M>(
        kind: ErrorKind,
        path: P,
        message: M,
        violations: Vec<Violation>,
    ) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            kind,
            document: None,
            path: path.into(),
            message: message.into(),
            schema_violations: violations,
        }
    }

    /// Create an error located by a validation context
    pub fn at<M: Into<String>>(kind: ErrorKind, context: &ValidationContext, message: M) -> Self {
        Self {
            kind,
            document: context.document.clone(),
            path: context.path.clone(),
            message: message.into(),
            schema_violations: Vec::new(),
        }
    }

    pub fn structural<M: Into<String>>(context: &ValidationContext, message: M) -> Self {
        Self::at(ErrorKind::Structural, context, message)
    }

    pub fn reference<M: Into<String>>(context: &ValidationContext, message: M) -> Self {
        Self::at(ErrorKind::Reference, context, message)
    }

    pub fn consistency<M: Into<String>>(context: &ValidationContext, message: M) -> Self {
        Self::at(ErrorKind::Consistency, context, message)
    }

    pub fn ordering<M: Into<String>>(context: &ValidationContext, message: M) -> Self {
        Self::at(ErrorKind::Ordering, context, message)
    }

    pub fn format<M: Into<String>>(context: &ValidationContext, message: M) -> Self {
        Self::at(ErrorKind::Format, context, message)
    }

    /// Attach a violation, builder style
    pub fn violation(mut self, violation: Violation) -> Self {
        self.schema_violations.push(violation);
        self
    }

    /// Name the document, unless one is already set
    pub fn in_document<D: Into<String>>(mut self, document: D) -> Self {
        if self.document.is_none() {
            self.document = Some(document.into());
        }
        self
    }

    /// Add a violation to this error
    pub fn add_violation(&mut self, violation: Violation) {
        self.schema_violations.push(violation);
    }

    /// Create a violation for a specific rule
    pub fn create_violation<R, E, A>(rule: R, expected: E, actual: A) -> Violation
    where
        R: Into<String>,
        E: Into<String>,
        A: Into<String>,
    {
        Violation {
            rule: rule.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Independent failures collected across several documents
///
/// Each document is still validated fail-fast; this only gathers the first
/// failure of every document in a batch.
#[derive(Debug, Error, Serialize, Deserialize)]
pub struct ValidationErrors {
    /// List of validation errors
    pub errors: Vec<ValidationError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Multiple validation errors occurred:")?;
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl ValidationErrors {
    /// Create a new validation errors collection
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Convert to result - Ok if no errors, Err if any errors exist
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_document_and_path() {
        let context = ValidationContext::for_document("people.yaml").child("octocat");
        let error = ValidationError::reference(&context, "Institution 'Acme' isn't in orgs.yaml");

        assert_eq!(
            error.to_string(),
            "Reference error in 'people.yaml' at '$.octocat': Institution 'Acme' isn't in orgs.yaml"
        );
    }

    #[test]
    fn test_display_lists_violations() {
        let error = ValidationError::new(ErrorKind::Format, "$.x", "bad color").violation(
            ValidationError::create_violation("color", "six hex digits", "'12345'"),
        );

        let text = error.to_string();
        assert!(text.starts_with("Format error at '$.x': bad color"));
        assert!(text.contains("Rule 'color' violated: expected six hex digits, but found '12345'"));
    }

    #[test]
    fn test_in_document_keeps_existing_name() {
        let context = ValidationContext::for_document("orgs.yaml");
        let error = ValidationError::structural(&context, "boom").in_document("people.yaml");
        assert_eq!(error.document.as_deref(), Some("orgs.yaml"));

        let unnamed = ValidationError::new(ErrorKind::Ordering, "$", "boom").in_document("labels.yaml");
        assert_eq!(unnamed.document.as_deref(), Some("labels.yaml"));
    }

    #[test]
    fn test_errors_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let errors: ValidationErrors =
            ValidationError::new(ErrorKind::Structural, "$", "boom").into();
        assert_eq!(errors.len(), 1);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::Consistency.as_str(), "consistency");
        assert_eq!(ErrorKind::Ordering.to_string(), "Ordering");
    }
}
