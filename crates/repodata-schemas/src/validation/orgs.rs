//! Organizations document validator
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::document::Node;
use crate::validation::base::{SchemaValidator, ValidationContext};
use crate::validation::error::{ValidationError, ValidationResult};
use crate::validation::ordering::check_sorted;
use crate::validation::predicates::{valid_email, valid_org_nickname, ORG_AGREEMENTS};
use crate::validation::references::ReferenceIndex;
use crate::validation::shape::{
    boolean, list_of, non_empty_string, string_in, string_where, RecordShape,
};
use tracing::{debug, instrument};

/// Contact blocks an organization may carry
pub const CONTACT_KEYS: &[&str] = &["contact", "contact1", "contact2"];

/// Validator for the orgs document
#[derive(Debug, Default)]
pub struct OrgsValidator;

impl OrgsValidator {
    pub fn new() -> Self {
        Self
    }

    fn org_shape<'c>() -> RecordShape<'c> {
        let contact = || {
            RecordShape::new("contact")
                .required("name", non_empty_string())
                .required("email", string_where("email", "local@domain.tld without , ; ? \\ %", valid_email))
                .into_check()
        };

        let mut shape = RecordShape::new("organization")
            .optional("name", non_empty_string())
            .required("agreement", string_in("agreement", ORG_AGREEMENTS))
            .optional("contractor", boolean())
            .optional("committer", boolean())
            .optional("internal", boolean());
        for key in CONTACT_KEYS {
            shape = shape.optional(*key, contact());
        }
        shape.optional(
            "subsidiaries",
            list_of(string_where("org nickname", "a name without '/'", valid_org_nickname)),
        )
    }
}

impl SchemaValidator for OrgsValidator {
    type Input = Node;

    #[instrument(skip_all, fields(document = context.document_name()))]
    fn validate_with_context(&self, input: &Node, context: &ValidationContext) -> ValidationResult<()> {
        let orgs = input.as_mapping().ok_or_else(|| {
            ValidationError::structural(
                context,
                format!("Expected a mapping of nicknames to organizations, found {}", input.kind()),
            )
        })?;

        let shape = Self::org_shape();
        for (nickname, record) in orgs.iter() {
            let record_context = context.child(nickname);
            if !valid_org_nickname(nickname) {
                return Err(ValidationError::format(
                    &record_context,
                    format!("Invalid org nickname: '{}'", nickname),
                ));
            }
            shape.validate(record, &record_context)?;
        }

        let mut index = ReferenceIndex::new(context.document_name());
        index.add_organizations(input);
        for (nickname, record) in orgs.iter() {
            if let Some(record) = record.as_mapping() {
                index.check_subsidiaries(record, &context.child(nickname))?;
            }
        }

        let keys: Vec<&str> = orgs.keys().collect();
        check_sorted(&keys, &format!("Keys in {}", context.document_name()), context)?;

        debug!(orgs = orgs.len(), "orgs document is valid");
        Ok(())
    }
}
