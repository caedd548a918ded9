//! People document validator
//!
//! The people document maps GitHub usernames to person records. Validation
//! runs in three passes: record shapes (with the optional repository
//! existence check), cross-references against the reference index, then key
//! order.
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::document::{Mapping, Node};
use crate::validation::base::{SchemaValidator, ValidationContext, ValidationHelpers};
use crate::validation::error::{ValidationError, ValidationResult};
use crate::validation::ordering::check_sorted;
use crate::validation::predicates::{
    not_data_key, valid_date_key, valid_email, valid_github_username, valid_org_nickname,
    valid_repo_name, PERSON_AGREEMENTS,
};
use crate::validation::references::ReferenceIndex;
use crate::validation::repo_lookup::{RepoCache, RepoLookup};
use crate::validation::shape::{
    any_string, boolean, list_of, literal_bool, map_of, non_empty_string, one_of, string_in,
    string_where, Check, RecordShape,
};
use tracing::{debug, instrument};

/// Keys of a committer grant, at least one of which must be present
pub const GRANT_SCOPES: &[&str] = &["orgs", "repos", "branches"];

/// Validator for the people document
pub struct PeopleValidator<'a> {
    index: &'a ReferenceIndex,
    repos: Option<&'a dyn RepoLookup>,
}

impl<'a> PeopleValidator<'a> {
    /// Create a validator resolving references through `index`
    pub fn new(index: &'a ReferenceIndex) -> Self {
        Self { index, repos: None }
    }

    /// Also confirm that every granted repository exists
    pub fn with_repo_lookup(mut self, lookup: &'a dyn RepoLookup) -> Self {
        self.repos = Some(lookup);
        self
    }

    fn validate_structure(
        &self,
        people: &Mapping,
        repos: Option<&RepoCache<'_>>,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        let shape = person_shape(repos);
        for (username, record) in people.iter() {
            let record_context = context.child(username);
            validate_username_key(username, &record_context)?;
            shape.validate(record, &record_context)?;
        }
        Ok(())
    }

    fn validate_references(&self, people: &Mapping, context: &ValidationContext) -> ValidationResult<()> {
        for (username, record) in people.iter() {
            let record_context = context.child(username);
            let Some(record) = record.as_mapping() else {
                continue;
            };
            self.validate_status(record, &record_context)?;

            if let Some(before) = record.get("before").and_then(Node::as_mapping) {
                let before_context = record_context.child("before");
                for (date, status) in before.iter() {
                    if let Some(status) = status.as_mapping() {
                        self.validate_status(status, &before_context.child(date))?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Institution and champion rules shared by a record and its overrides
    fn validate_status(&self, status: &Mapping, context: &ValidationContext) -> ValidationResult<()> {
        self.index.check_institution(status, context)?;
        if let Some(grant) = status.get("committer") {
            self.index.check_champions(grant, &context.child("committer"))?;
        }
        Ok(())
    }
}

impl SchemaValidator for PeopleValidator<'_> {
    type Input = Node;

    #[instrument(skip_all, fields(document = context.document_name()))]
    fn validate_with_context(&self, input: &Node, context: &ValidationContext) -> ValidationResult<()> {
        let people = input.as_mapping().ok_or_else(|| {
            ValidationError::structural(
                context,
                format!("Expected a mapping of usernames to people, found {}", input.kind()),
            )
        })?;

        let cache = self.repos.map(RepoCache::new);
        self.validate_structure(people, cache.as_ref(), context)?;
        self.validate_references(people, context)?;

        let keys: Vec<&str> = people.keys().collect();
        check_sorted(&keys, &format!("Keys in {}", context.document_name()), context)?;

        debug!(
            people = people.len(),
            repo_lookups = cache.as_ref().map_or(0, |cache| cache.len()),
            "people document is valid"
        );
        Ok(())
    }
}

fn validate_username_key(username: &str, context: &ValidationContext) -> ValidationResult<()> {
    if !not_data_key(username) {
        return Err(ValidationError::structural(
            context,
            format!("'{}' is a person field, not a username; is the record mis-indented?", username),
        ));
    }
    if !valid_github_username(username) {
        return Err(ValidationError::format(
            context,
            format!("Invalid GitHub username: '{}'", username),
        )
        .violation(ValidationError::create_violation(
            "github_username",
            "letters, digits, '_' or '-', optionally ending in '*' or a bot suffix",
            format!("'{}'", username),
        )));
    }
    Ok(())
}

fn email<'c>() -> Check<'c> {
    string_where("email", "local@domain.tld without , ; ? \\ %", valid_email)
}

fn repo_reference<'c>(repos: Option<&'c RepoCache<'c>>) -> Check<'c> {
    let shape = string_where("repository name", "owner/name", valid_repo_name);
    Box::new(move |node, context| {
        shape(node, context)?;
        match (repos, node.as_str()) {
            (Some(cache), Some(full_name)) => cache.check_exists(full_name, context),
            _ => Ok(()),
        }
    })
}

/// `false`, or a grant naming at least one of orgs, repos or branches
fn committer_grant<'c>(repos: Option<&'c RepoCache<'c>>) -> Check<'c> {
    let grant = RecordShape::new("committer grant")
        .optional("orgs", list_of(string_where("org nickname", "a name without '/'", valid_org_nickname)))
        .optional("repos", list_of(repo_reference(repos)))
        .optional("champions", list_of(any_string()))
        .optional("branches", list_of(non_empty_string()));

    let scoped_grant: Check<'c> = Box::new(move |node, context| {
        let mapping = grant.validate(node, context)?;
        ValidationHelpers::validate_at_least_one_of(mapping, GRANT_SCOPES, context)
    });

    one_of(vec![
        ("not a committer (false)", literal_bool(false)),
        ("committer grant", scoped_grant),
    ])
}

fn historical_override<'c>(repos: Option<&'c RepoCache<'c>>) -> Check<'c> {
    RecordShape::new("historical override")
        .optional("agreement", string_in("agreement", PERSON_AGREEMENTS))
        .optional("institution", non_empty_string())
        .optional("comments", list_of(any_string()))
        .optional("committer", committer_grant(repos))
        .into_check()
}

fn person_shape<'c>(repos: Option<&'c RepoCache<'c>>) -> RecordShape<'c> {
    RecordShape::new("person")
        .required("name", non_empty_string())
        .required("email", email())
        .required("agreement", string_in("agreement", PERSON_AGREEMENTS))
        .optional("institution", non_empty_string())
        .optional("is_robot", literal_bool(true))
        .optional("jira", non_empty_string())
        .optional("comments", list_of(any_string()))
        .optional("other_emails", list_of(email()))
        .optional(
            "before",
            map_of(
                string_where("date", "a YYYY-MM-DD date", valid_date_key),
                historical_override(repos),
            ),
        )
        .optional("beta", boolean())
        .optional("contractor", boolean())
        .optional("committer", committer_grant(repos))
        .optional("email_ok", boolean())
}
