//! Labels document validator
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::document::Node;
use crate::validation::base::{SchemaValidator, ValidationContext};
use crate::validation::error::{ValidationError, ValidationResult};
use crate::validation::ordering::check_sorted;
use crate::validation::predicates::valid_color;
use crate::validation::shape::{any_string, literal_bool, one_of, string_where, Check, RecordShape};
use tracing::{debug, instrument};

/// Validator for the labels document
///
/// Each label is either marked `delete: true` or carries a color and an
/// optional description.
#[derive(Debug, Default)]
pub struct LabelsValidator;

impl LabelsValidator {
    pub fn new() -> Self {
        Self
    }

    fn label_check<'c>() -> Check<'c> {
        one_of(vec![
            (
                "deleted label",
                RecordShape::new("deleted label")
                    .required("delete", literal_bool(true))
                    .into_check(),
            ),
            (
                "colored label",
                RecordShape::new("label")
                    .required("color", string_where("color", "six hex digits", valid_color))
                    .optional("description", any_string())
                    .into_check(),
            ),
        ])
    }
}

impl SchemaValidator for LabelsValidator {
    type Input = Node;

    #[instrument(skip_all, fields(document = context.document_name()))]
    fn validate_with_context(&self, input: &Node, context: &ValidationContext) -> ValidationResult<()> {
        let labels = input.as_mapping().ok_or_else(|| {
            ValidationError::structural(
                context,
                format!("Expected a mapping of label names to labels, found {}", input.kind()),
            )
        })?;

        let check = Self::label_check();
        for (name, label) in labels.iter() {
            check(label, &context.child(name))?;
        }

        let keys: Vec<&str> = labels.keys().collect();
        check_sorted(&keys, &format!("Keys in {}", context.document_name()), context)?;

        debug!(labels = labels.len(), "labels document is valid");
        Ok(())
    }
}
