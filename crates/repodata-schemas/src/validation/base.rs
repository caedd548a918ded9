//! Base validation trait and common utilities
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::document::Mapping;
use crate::validation::error::{ValidationError, ValidationErrors, ValidationResult};

/// Location of the value being validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// Current key path, rooted at `$`
    pub path: String,
    /// Name of the document under validation
    pub document: Option<String>,
}

impl ValidationContext {
    /// Create a root context for an unnamed document
    pub fn new() -> Self {
        Self {
            path: "$".to_string(),
            document: None,
        }
    }

    /// Create a root context for a named document
    pub fn for_document<D: Into<String>>(document: D) -> Self {
        Self {
            path: "$".to_string(),
            document: Some(document.into()),
        }
    }

    /// Create a child context with updated path
    pub fn child<P: AsRef<str>>(&self, path_segment: P) -> Self {
        let new_path = if self.path == "$" {
            format!("$.{}", path_segment.as_ref())
        } else {
            format!("{}.{}", self.path, path_segment.as_ref())
        };

        Self {
            path: new_path,
            document: self.document.clone(),
        }
    }

    /// Create a child context for array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            document: self.document.clone(),
        }
    }

    /// Document name for messages, `<input>` when unnamed
    pub fn document_name(&self) -> &str {
        self.document.as_deref().unwrap_or("<input>")
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Base trait for document validators
pub trait SchemaValidator {
    /// The type being validated
    type Input: ?Sized;

    /// Validate a complete document with all rules
    fn validate(&self, input: &Self::Input) -> ValidationResult<()> {
        self.validate_with_context(input, &ValidationContext::new())
    }

    /// Validate with an explicit root context
    fn validate_with_context(
        &self,
        input: &Self::Input,
        context: &ValidationContext,
    ) -> ValidationResult<()>;

    /// Collect the validation error, if any (non-failing)
    fn collect_errors(&self, input: &Self::Input) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Err(error) = self.validate(input) {
            errors.add(error);
        }
        errors
    }
}

/// Helper functions for common validation patterns
pub struct ValidationHelpers;

impl ValidationHelpers {
    /// Validate that a value is one of the allowed literals
    pub fn validate_enum_value(
        value: &str,
        allowed_values: &[&str],
        field_name: &str,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        if allowed_values.contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::format(
                context,
                format!("Invalid value for {}: '{}'", field_name, value),
            )
            .violation(ValidationError::create_violation(
                "enum_value",
                format!("one of: {}", allowed_values.join(", ")),
                value.to_string(),
            )))
        }
    }

    /// Validate that a field is absent when a condition is met
    pub fn validate_conditional_absence<T>(
        condition: bool,
        field_value: Option<&T>,
        message: &str,
        field_name: &str,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        if condition && field_value.is_some() {
            Err(ValidationError::consistency(context, message).violation(
                ValidationError::create_violation(
                    "conditional_absence",
                    format!("{} to be absent", field_name),
                    "field is present".to_string(),
                ),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate that a mapping has at least one of the given keys
    pub fn validate_at_least_one_of(
        mapping: &Mapping,
        field_names: &[&str],
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        if field_names.iter().any(|name| mapping.contains_key(name)) {
            return Ok(());
        }

        Err(ValidationError::structural(
            context,
            format!("Must have at least one of {}", field_names.join(", ")),
        )
        .violation(ValidationError::create_violation(
            "at_least_one_of",
            format!("one of: {}", field_names.join(", ")),
            format!("keys: {}", mapping.keys().collect::<Vec<_>>().join(", ")),
        )))
    }
}
