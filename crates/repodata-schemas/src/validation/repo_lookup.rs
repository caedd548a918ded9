//! Remote repository existence checks
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::validation::base::ValidationContext;
use crate::validation::error::{ValidationError, ValidationResult};
use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Failure to reach or interpret the remote service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoLookupError {
    /// Non-success response other than not-found
    #[error("GitHub responded with {status} for repo {repo}")]
    Status { repo: String, status: u16 },

    /// Request could not be sent or the body could not be read
    #[error("Request for repo {repo} failed: {reason}")]
    Transport { repo: String, reason: String },
}

/// Resolves an `owner/name` reference to its canonical `owner/name`
pub trait RepoLookup {
    /// `Ok(None)` when the repository does not exist
    fn canonical_name(&self, full_name: &str) -> Result<Option<String>, RepoLookupError>;
}

impl<F> RepoLookup for F
where
    F: Fn(&str) -> Result<Option<String>, RepoLookupError>,
{
    fn canonical_name(&self, full_name: &str) -> Result<Option<String>, RepoLookupError> {
        self(full_name)
    }
}

/// Memoizes lookups for the duration of one validation call
///
/// Keyed by the exact reference string, so `Org/Repo` and `org/repo` are
/// looked up separately and the case mismatch is reported.
pub struct RepoCache<'a> {
    lookup: &'a dyn RepoLookup,
    outcomes: RefCell<HashMap<String, Result<Option<String>, RepoLookupError>>>,
}

impl<'a> RepoCache<'a> {
    pub fn new(lookup: &'a dyn RepoLookup) -> Self {
        Self {
            lookup,
            outcomes: RefCell::new(HashMap::new()),
        }
    }

    fn resolve(&self, full_name: &str) -> Result<Option<String>, RepoLookupError> {
        if let Some(outcome) = self.outcomes.borrow().get(full_name) {
            trace!(repo = full_name, "repo lookup cache hit");
            return outcome.clone();
        }

        debug!(repo = full_name, "looking up repo");
        let outcome = self.lookup.canonical_name(full_name);
        self.outcomes
            .borrow_mut()
            .insert(full_name.to_string(), outcome.clone());
        outcome
    }

    /// Number of distinct references looked up so far
    pub fn len(&self) -> usize {
        self.outcomes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.borrow().is_empty()
    }

    /// Fail unless `full_name` exists under exactly that name
    pub fn check_exists(&self, full_name: &str, context: &ValidationContext) -> ValidationResult<()> {
        match self.resolve(full_name) {
            Ok(Some(actual)) if actual == full_name => Ok(()),
            Ok(Some(actual)) => Err(ValidationError::reference(
                context,
                format!("Repo {} is actually at {}", full_name, actual),
            )
            .violation(ValidationError::create_violation(
                "repo_canonical_name",
                format!("'{}'", actual),
                format!("'{}'", full_name),
            ))),
            Ok(None) => Err(ValidationError::reference(
                context,
                format!("Repo {} doesn't exist", full_name),
            )),
            Err(error) => Err(ValidationError::reference(context, error.to_string())),
        }
    }
}
