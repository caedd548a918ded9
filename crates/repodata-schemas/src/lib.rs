//! Repodata Schemas - validators for repository contributor data
//!
//! This crate checks the data files a repository keeps about its
//! contributors before changes to them are accepted:
//! - **people.yaml**: GitHub username → person record (agreement, institution, committer grants)
//! - **orgs.yaml**: nickname → organization record
//! - **labels.yaml**: label name → color or deletion marker
//! - **CLA export**: CSV report from the CRM, one row per signer
//!
//! ## Features
//!
//! - **Duplicate-key guard**: a key repeated in any YAML mapping is an error
//! - **Closed schemas**: unknown keys are rejected at every level
//! - **Cross-references**: institutions, champions and subsidiaries must resolve
//! - **Sorted keys**: out-of-place keys are named precisely, with a diff
//! - **Repository checks**: optional existence check through [`RepoLookup`]
//!   (GitHub client behind the `github` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use repodata_schemas::{Source, ValidationEngine};
//!
//! let engine = ValidationEngine::default();
//! let orgs = Source::new("orgs.yaml", "acme:\n  agreement: institution\n");
//! let people = Source::new(
//!     "people.yaml",
//!     "octocat:\n  name: Mona\n  email: mona@example.com\n  agreement: institution\n  institution: acme\n",
//! );
//!
//! match engine.validate_people(&people, &orgs) {
//!     Ok(()) => println!("people.yaml is valid"),
//!     Err(e) => println!("{}", e),
//! }
//! ```
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

pub mod document;
pub mod engine;
#[cfg(feature = "github")]
pub mod github;
pub mod loader;
pub mod validation;

// Re-export commonly used types for convenience
pub use document::{decode_yaml, Mapping, Node};
pub use engine::{batch_errors, EngineConfig, FileOutcome, ValidationEngine, DEFAULT_EXPORT_ENCODING, DEFAULT_ORGS_FILE};
#[cfg(feature = "github")]
pub use github::GitHubRepoLookup;
pub use loader::{DocumentKind, LoaderError, LoaderResult, Source};
pub use validation::{
    check_sorted, out_of_place_keys, ErrorKind, LabelsValidator, OrgsValidator, PeopleValidator,
    ReferenceIndex, RepoCache, RepoLookup, RepoLookupError, SalesforceExportValidator,
    SchemaValidator, ValidationContext, ValidationError, ValidationErrors, ValidationHelpers,
    ValidationResult, Violation,
};
