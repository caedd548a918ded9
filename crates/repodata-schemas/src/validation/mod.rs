//! Validation for people, orgs, labels and the CLA export
//!
//! Each document kind has a validator implementing [`SchemaValidator`]. Every
//! validator is fail-fast: the first violation aborts with a
//! [`ValidationError`] naming the document, the key path and the offending
//! value.
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod error;
pub mod labels;
pub mod ordering;
pub mod orgs;
pub mod people;
pub mod predicates;
pub mod references;
pub mod repo_lookup;
pub mod salesforce;
pub mod shape;

// Re-export commonly used types
pub use base::{SchemaValidator, ValidationContext, ValidationHelpers};
pub use error::{ErrorKind, ValidationError, ValidationErrors, ValidationResult, Violation};
pub use labels::LabelsValidator;
pub use ordering::{check_sorted, out_of_place_keys};
pub use orgs::OrgsValidator;
pub use people::PeopleValidator;
pub use references::ReferenceIndex;
pub use repo_lookup::{RepoCache, RepoLookup, RepoLookupError};
pub use salesforce::SalesforceExportValidator;
