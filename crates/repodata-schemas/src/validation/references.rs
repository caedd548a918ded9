//! Cross-document reference checks
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::document::{Mapping, Node};
use crate::validation::base::{ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationResult};
use std::collections::HashSet;
use tracing::debug;

/// Lookup sets built from already-decoded sibling documents
///
/// Built once per validation call and passed explicitly to the validators
/// that need it.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    organizations: HashSet<String>,
    people: HashSet<String>,
    orgs_document: String,
}

impl ReferenceIndex {
    /// Create an empty index; `orgs_document` names the organization file in messages
    pub fn new<D: Into<String>>(orgs_document: D) -> Self {
        Self {
            organizations: HashSet::new(),
            people: HashSet::new(),
            orgs_document: orgs_document.into(),
        }
    }

    /// Build both lookup sets from decoded people and orgs documents
    pub fn from_documents<D: Into<String>>(people: &Node, orgs: &Node, orgs_document: D) -> Self {
        let mut index = Self::new(orgs_document);
        index.add_organizations(orgs);
        index.add_people(people);
        debug!(
            organizations = index.organizations.len(),
            people = index.people.len(),
            "built reference index"
        );
        index
    }

    /// Add every organization nickname and every declared display name
    pub fn add_organizations(&mut self, orgs: &Node) {
        if let Some(mapping) = orgs.as_mapping() {
            for (nickname, record) in mapping.iter() {
                self.organizations.insert(nickname.to_string());
                if let Some(name) = record.as_mapping().and_then(|r| r.get_str("name")) {
                    self.organizations.insert(name.to_string());
                }
            }
        }
    }

    /// Add every top-level username
    pub fn add_people(&mut self, people: &Node) {
        if let Some(mapping) = people.as_mapping() {
            self.people.extend(mapping.keys().map(str::to_string));
        }
    }

    pub fn has_organization(&self, identifier: &str) -> bool {
        self.organizations.contains(identifier)
    }

    pub fn has_person(&self, username: &str) -> bool {
        self.people.contains(username)
    }

    pub fn organization_count(&self) -> usize {
        self.organizations.len()
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    /// Agreement and institution must agree, and the institution must resolve
    ///
    /// Applies to a person record and to each historical override.
    pub fn check_institution(&self, record: &Mapping, context: &ValidationContext) -> ValidationResult<()> {
        let institution = record.get("institution");
        match record.get_str("agreement") {
            Some("institution") => {
                if let Some(name) = institution.and_then(Node::as_str) {
                    if !self.has_organization(name) {
                        return Err(ValidationError::reference(
                            &context.child("institution"),
                            format!("Institution '{}' isn't in {}", name, self.orgs_document),
                        )
                        .violation(ValidationError::create_violation(
                            "institution_exists",
                            format!("an organization nickname or name from {}", self.orgs_document),
                            format!("'{}'", name),
                        )));
                    }
                }
                Ok(())
            }
            Some("none") => ValidationHelpers::validate_conditional_absence(
                true,
                institution,
                "No-agreement should have no institution",
                "institution",
                context,
            ),
            _ => Ok(()),
        }
    }

    /// Every champion of a committer grant must be a known person
    pub fn check_champions(&self, grant: &Node, context: &ValidationContext) -> ValidationResult<()> {
        let champions = grant
            .as_mapping()
            .and_then(|g| g.get("champions"))
            .and_then(Node::as_sequence)
            .unwrap_or_default();

        let champions_context = context.child("champions");
        for (index, champion) in champions.iter().enumerate() {
            let Some(username) = champion.as_str() else {
                continue;
            };
            if !self.has_person(username) {
                return Err(ValidationError::reference(
                    &champions_context.child_index(index),
                    format!("Champion '{}' isn't a known person", username),
                )
                .violation(ValidationError::create_violation(
                    "champion_exists",
                    "a username from the people document",
                    format!("'{}'", username),
                )));
            }
        }
        Ok(())
    }

    /// Every subsidiary of an organization must name a known organization
    pub fn check_subsidiaries(&self, org: &Mapping, context: &ValidationContext) -> ValidationResult<()> {
        let subsidiaries = org
            .get("subsidiaries")
            .and_then(Node::as_sequence)
            .unwrap_or_default();

        for (index, subsidiary) in subsidiaries.iter().enumerate() {
            if let Some(nickname) = subsidiary.as_str() {
                if !self.has_organization(nickname) {
                    return Err(ValidationError::reference(
                        &context.child("subsidiaries").child_index(index),
                        format!("Subsidiary '{}' isn't in {}", nickname, self.orgs_document),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::decode_yaml;
    use crate::validation::error::ErrorKind;

    fn yaml(text: &str) -> Node {
        decode_yaml(text, &ValidationContext::new()).unwrap()
    }

    fn index() -> ReferenceIndex {
        let orgs = yaml("acme:\n  name: Acme Corporation\n  agreement: institution\nsolo:\n  agreement: none\n");
        let people = yaml("alice:\n  name: Alice\nbob:\n  name: Bob\n");
        ReferenceIndex::from_documents(&people, &orgs, "orgs.yaml")
    }

    fn record(text: &str) -> Mapping {
        yaml(text).as_mapping().cloned().unwrap()
    }

    #[test]
    fn test_index_contents() {
        let index = index();
        assert!(index.has_organization("acme"));
        assert!(index.has_organization("Acme Corporation"));
        assert!(index.has_organization("solo"));
        assert!(!index.has_organization("Acme"));
        assert!(index.has_person("bob"));
        assert_eq!(index.organization_count(), 3);
        assert_eq!(index.person_count(), 2);
    }

    #[test]
    fn test_institution_resolves_by_nickname_or_name() {
        let ctx = ValidationContext::new();
        let index = index();
        assert!(index.check_institution(&record("agreement: institution\ninstitution: acme\n"), &ctx).is_ok());
        assert!(index
            .check_institution(&record("agreement: institution\ninstitution: Acme Corporation\n"), &ctx)
            .is_ok());

        let err = index
            .check_institution(&record("agreement: institution\ninstitution: Initech\n"), &ctx)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Reference);
        assert_eq!(err.message, "Institution 'Initech' isn't in orgs.yaml");
        assert_eq!(err.path, "$.institution");
    }

    #[test]
    fn test_no_agreement_forbids_institution() {
        let err = index()
            .check_institution(&record("agreement: none\ninstitution: acme\n"), &ValidationContext::new())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Consistency);
        assert!(err.message.contains("No-agreement should have no institution"));
    }

    #[test]
    fn test_individual_agreement_ignores_institution() {
        let ctx = ValidationContext::new();
        assert!(index()
            .check_institution(&record("agreement: individual\ninstitution: Initech\n"), &ctx)
            .is_ok());
    }

    #[test]
    fn test_champions_must_be_people() {
        let ctx = ValidationContext::new().child("carol").child("committer");
        let index = index();
        assert!(index.check_champions(&yaml("champions: [alice, bob]\norgs: [acme]\n"), &ctx).is_ok());
        assert!(index.check_champions(&Node::Bool(false), &ctx).is_ok());

        let err = index
            .check_champions(&yaml("champions: [alice, mallory]\n"), &ctx)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Reference);
        assert_eq!(err.path, "$.carol.committer.champions[1]");
        assert!(err.message.contains("mallory"));
    }

    #[test]
    fn test_subsidiaries_must_resolve() {
        let ctx = ValidationContext::new();
        let index = index();
        assert!(index.check_subsidiaries(&record("subsidiaries: [solo]\n"), &ctx).is_ok());
        let err = index.check_subsidiaries(&record("subsidiaries: [ghost]\n"), &ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Reference);
    }
}
