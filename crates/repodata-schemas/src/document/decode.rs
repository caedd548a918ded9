//! YAML decoding with the duplicate-key guard
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::document::node::{Mapping, Node, SourceText};
use crate::validation::base::ValidationContext;
use crate::validation::error::{ValidationError, ValidationResult};
use serde::de::DeserializeSeed;
use std::collections::HashSet;
use tracing::trace;

/// Decode YAML text, rejecting any mapping that repeats a key
///
/// Keys keep their source text, and plain scalars that only YAML 1.2 reads as
/// numbers (`5319e7`) stay strings. Syntax errors and non-scalar keys are
/// structural failures. A repeated key at any nesting level is a consistency
/// failure, even when both values are identical.
pub fn decode_yaml(text: &str, context: &ValidationContext) -> ValidationResult<Node> {
    if text.trim().is_empty() {
        return Ok(Node::Null);
    }

    let parse_error = |e: serde_yaml::Error| {
        let location = e
            .location()
            .map(|loc| format!(" (line {}, column {})", loc.line(), loc.column()))
            .unwrap_or_default();
        ValidationError::structural(context, format!("Failed to parse YAML{}: {}", location, e))
    };
    let typed: Node = serde_yaml::from_str(text).map_err(parse_error)?;
    let node = SourceText(&typed)
        .deserialize(serde_yaml::Deserializer::from_str(text))
        .map_err(parse_error)?;

    reject_duplicate_keys(&node, context)?;
    trace!(document = context.document_name(), kind = node.kind(), "decoded document");
    Ok(node)
}

/// Walk the tree and fail on the first key repeated within one mapping
pub fn reject_duplicate_keys(node: &Node, context: &ValidationContext) -> ValidationResult<()> {
    match node {
        Node::Mapping(mapping) => reject_in_mapping(mapping, context),
        Node::Sequence(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(index, item)| reject_duplicate_keys(item, &context.child_index(index))),
        _ => Ok(()),
    }
}

fn reject_in_mapping(mapping: &Mapping, context: &ValidationContext) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(mapping.len());
    for (key, value) in mapping.iter() {
        reject_duplicate_keys(value, &context.child(key))?;
        if !seen.insert(key) {
            return Err(ValidationError::consistency(
                context,
                format!("found duplicate key '{}'", key),
            )
            .violation(ValidationError::create_violation(
                "unique_keys",
                "each key at most once per mapping",
                format!("'{}' repeated", key),
            )));
        }
    }
    Ok(())
}
