//! Composable shape checks over decoded documents
//!
//! A schema is assembled from small boxed checks: scalar checks built from
//! the predicates, containers (`list_of`, `map_of`), ordered alternation
//! (`one_of`) and [`RecordShape`], a table of required and optional keys that
//! rejects anything it does not declare.
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::document::{Mapping, Node};
use crate::validation::base::{ValidationContext, ValidationHelpers};
use crate::validation::error::{ErrorKind, ValidationError, ValidationResult};

/// A boxed check of one node at one location
pub type Check<'a> = Box<dyn Fn(&Node, &ValidationContext) -> ValidationResult<()> + 'a>;

fn type_mismatch(expected: &str, node: &Node, context: &ValidationContext) -> ValidationError {
    ValidationError::structural(
        context,
        format!("Expected {}, found {}", expected, node.kind()),
    )
    .violation(ValidationError::create_violation("type", expected, node.describe()))
}

/// Any string
pub fn any_string<'a>() -> Check<'a> {
    Box::new(|node, context| match node {
        Node::String(_) => Ok(()),
        other => Err(type_mismatch("a string", other, context)),
    })
}

/// A string accepted by `predicate`; a rejected string is a format failure
pub fn string_where<'a>(
    rule: &'static str,
    expected: &'static str,
    predicate: fn(&str) -> bool,
) -> Check<'a> {
    Box::new(move |node, context| {
        let value = node.as_str().ok_or_else(|| type_mismatch("a string", node, context))?;
        if predicate(value) {
            Ok(())
        } else {
            Err(ValidationError::format(context, format!("Invalid {}: '{}'", rule, value))
                .violation(ValidationError::create_violation(rule, expected, format!("'{}'", value))))
        }
    })
}

/// One of a fixed set of string literals
pub fn string_in<'a>(field: &'static str, allowed: &'static [&'static str]) -> Check<'a> {
    Box::new(move |node, context| {
        let value = node.as_str().ok_or_else(|| type_mismatch("a string", node, context))?;
        ValidationHelpers::validate_enum_value(value, allowed, field, context)
    })
}

/// A string of length at least one
pub fn non_empty_string<'a>() -> Check<'a> {
    string_where("non-empty string", "a string of length >= 1", crate::validation::predicates::not_empty_string)
}

/// `true` or `false`
pub fn boolean<'a>() -> Check<'a> {
    Box::new(|node, context| match node {
        Node::Bool(_) => Ok(()),
        other => Err(type_mismatch("a boolean", other, context)),
    })
}

/// Exactly the boolean `expected`
pub fn literal_bool<'a>(expected: bool) -> Check<'a> {
    Box::new(move |node, context| match node {
        Node::Bool(value) if *value == expected => Ok(()),
        other => Err(ValidationError::structural(
            context,
            format!("Expected the literal {}, found {}", expected, other.describe()),
        )
        .violation(ValidationError::create_violation(
            "literal",
            expected.to_string(),
            other.describe(),
        ))),
    })
}

/// A list whose every item passes `item`
pub fn list_of<'a>(item: Check<'a>) -> Check<'a> {
    Box::new(move |node, context| {
        let items = node
            .as_sequence()
            .ok_or_else(|| type_mismatch("a list", node, context))?;
        items
            .iter()
            .enumerate()
            .try_for_each(|(index, value)| item(value, &context.child_index(index)))
    })
}

/// A mapping whose keys pass `key` and whose values pass `value`
///
/// Keys are checked as string nodes at the location of their entry.
pub fn map_of<'a>(key: Check<'a>, value: Check<'a>) -> Check<'a> {
    Box::new(move |node, context| {
        let mapping = node
            .as_mapping()
            .ok_or_else(|| type_mismatch("a mapping", node, context))?;
        for (name, entry) in mapping.iter() {
            let entry_context = context.child(name);
            key(&Node::String(name.to_string()), &entry_context)?;
            value(entry, &entry_context)?;
        }
        Ok(())
    })
}

/// Every check must pass, in order
pub fn all_of<'a>(checks: Vec<Check<'a>>) -> Check<'a> {
    Box::new(move |node, context| checks.iter().try_for_each(|check| check(node, context)))
}

/// Ordered alternation between named shapes
///
/// The first branch that passes wins. A branch that fails with anything other
/// than a structural error matched the shape, so its error is reported as is.
/// When every branch fails structurally, one structural error lists each
/// attempted shape with its failure.
pub fn one_of<'a>(branches: Vec<(&'static str, Check<'a>)>) -> Check<'a> {
    Box::new(move |node, context| {
        let mut attempts = Vec::with_capacity(branches.len());
        for (name, check) in &branches {
            match check(node, context) {
                Ok(()) => return Ok(()),
                Err(error) if error.kind != ErrorKind::Structural => return Err(error),
                Err(error) => attempts.push((*name, error)),
            }
        }

        let names: Vec<&str> = attempts.iter().map(|(name, _)| *name).collect();
        let violations = attempts
            .iter()
            .map(|(name, error)| {
                ValidationError::create_violation(
                    "one_of",
                    *name,
                    format!("{} (at '{}')", error.message, error.path),
                )
            })
            .collect();
        let mut error = ValidationError::structural(
            context,
            format!("Value matches none of: {}", names.join(", ")),
        );
        error.schema_violations = violations;
        Err(error)
    })
}

struct Field<'a> {
    key: &'static str,
    required: bool,
    check: Check<'a>,
}

/// A mapping with an explicit table of required and optional keys
pub struct RecordShape<'a> {
    name: &'static str,
    fields: Vec<Field<'a>>,
}

impl<'a> RecordShape<'a> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn required(mut self, key: &'static str, check: Check<'a>) -> Self {
        self.fields.push(Field {
            key,
            required: true,
            check,
        });
        self
    }

    pub fn optional(mut self, key: &'static str, check: Check<'a>) -> Self {
        self.fields.push(Field {
            key,
            required: false,
            check,
        });
        self
    }

    /// Declared keys, in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.key)
    }

    /// Validate `node` and return its mapping on success
    pub fn validate<'n>(&self, node: &'n Node, context: &ValidationContext) -> ValidationResult<&'n Mapping> {
        let expected = format!("a {} mapping", self.name);
        let mapping = node
            .as_mapping()
            .ok_or_else(|| type_mismatch(&expected, node, context))?;

        if let Some(unknown) = mapping
            .keys()
            .find(|key| !self.fields.iter().any(|field| field.key == *key))
        {
            return Err(ValidationError::structural(
                context,
                format!("Unknown key '{}' in {} at '{}'", unknown, self.name, context.path),
            )
            .violation(ValidationError::create_violation(
                "known_keys",
                format!("one of: {}", self.keys().collect::<Vec<_>>().join(", ")),
                format!("'{}'", unknown),
            )));
        }

        if let Some(missing) = self
            .fields
            .iter()
            .find(|field| field.required && !mapping.contains_key(field.key))
        {
            return Err(ValidationError::structural(
                context,
                format!("Missing required key '{}' in {}", missing.key, self.name),
            )
            .violation(ValidationError::create_violation(
                "required_key",
                format!("'{}' to be present", missing.key),
                "field is missing".to_string(),
            )));
        }

        for field in &self.fields {
            if let Some(value) = mapping.get(field.key) {
                (field.check)(value, &context.child(field.key))?;
            }
        }

        Ok(mapping)
    }

    pub fn into_check(self) -> Check<'a> {
        Box::new(move |node, context| self.validate(node, context).map(|_| ()))
    }
}
