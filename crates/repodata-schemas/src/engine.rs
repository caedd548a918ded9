//! Validation engine: decodes documents and runs the matching validators
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::document::decode_yaml;
use crate::loader::{DocumentKind, LoaderError, LoaderResult, Source};
use crate::validation::base::{SchemaValidator, ValidationContext};
use crate::validation::error::{ValidationError, ValidationErrors, ValidationResult};
use crate::validation::references::ReferenceIndex;
use crate::validation::repo_lookup::RepoLookup;
use crate::validation::{LabelsValidator, OrgsValidator, PeopleValidator, SalesforceExportValidator};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// File name of the orgs document expected next to the people document
pub const DEFAULT_ORGS_FILE: &str = "orgs.yaml";

/// Encoding of the CRM export
pub const DEFAULT_EXPORT_ENCODING: &str = "cp1252";

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Orgs document loaded from the people document's directory
    pub orgs_file_name: String,
    /// Encoding used to read the CSV export
    pub salesforce_encoding: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            orgs_file_name: DEFAULT_ORGS_FILE.to_string(),
            salesforce_encoding: DEFAULT_EXPORT_ENCODING.to_string(),
        }
    }
}

/// Outcome of one file in a batch
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub kind: DocumentKind,
    /// First failure, `None` when the file is valid
    pub error: Option<ValidationError>,
}

impl FileOutcome {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Validation failures of a batch, in file order
pub fn batch_errors(outcomes: &[FileOutcome]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for error in outcomes.iter().filter_map(|outcome| outcome.error.clone()) {
        errors.add(error);
    }
    errors
}

/// Validates the data documents of a repository
///
/// Stateless between calls: reference sets and the repository cache are
/// rebuilt for every validation.
#[derive(Default)]
pub struct ValidationEngine {
    config: EngineConfig,
    repo_lookup: Option<Box<dyn RepoLookup>>,
}

impl ValidationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            repo_lookup: None,
        }
    }

    /// Confirm granted repositories exist through `lookup`
    pub fn with_repo_lookup(mut self, lookup: Box<dyn RepoLookup>) -> Self {
        self.repo_lookup = Some(lookup);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate the people document against its sibling orgs document
    #[instrument(skip_all, fields(people = %people.name, orgs = %orgs.name))]
    pub fn validate_people(&self, people: &Source, orgs: &Source) -> ValidationResult<()> {
        let people_context = ValidationContext::for_document(&people.name);
        let orgs_node = decode_yaml(&orgs.text, &ValidationContext::for_document(&orgs.name))?;
        let people_node = decode_yaml(&people.text, &people_context)?;

        let index = ReferenceIndex::from_documents(&people_node, &orgs_node, &orgs.name);
        let mut validator = PeopleValidator::new(&index);
        if let Some(lookup) = self.repo_lookup.as_deref() {
            validator = validator.with_repo_lookup(lookup);
        }
        validator.validate_with_context(&people_node, &people_context)
    }

    #[instrument(skip_all, fields(orgs = %orgs.name))]
    pub fn validate_orgs(&self, orgs: &Source) -> ValidationResult<()> {
        let context = ValidationContext::for_document(&orgs.name);
        let node = decode_yaml(&orgs.text, &context)?;
        OrgsValidator::new().validate_with_context(&node, &context)
    }

    #[instrument(skip_all, fields(labels = %labels.name))]
    pub fn validate_labels(&self, labels: &Source) -> ValidationResult<()> {
        let context = ValidationContext::for_document(&labels.name);
        let node = decode_yaml(&labels.text, &context)?;
        LabelsValidator::new().validate_with_context(&node, &context)
    }

    #[instrument(skip_all, fields(export = %export.name))]
    pub fn validate_salesforce_export(&self, export: &Source) -> ValidationResult<()> {
        let context = ValidationContext::for_document(&export.name);
        SalesforceExportValidator::new().validate_with_context(&export.text, &context)
    }

    /// Path of the orgs document that goes with `people_path`
    pub fn sibling_orgs_path(&self, people_path: &Path) -> PathBuf {
        people_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.config.orgs_file_name)
    }

    /// Validate a people file, loading the orgs file next to it
    pub fn validate_people_file(&self, path: &Path) -> LoaderResult<()> {
        let orgs_path = self.sibling_orgs_path(path);
        self.validate_people_file_with_orgs(path, &orgs_path)
    }

    /// Validate a people file against an explicit orgs file
    pub fn validate_people_file_with_orgs(&self, path: &Path, orgs_path: &Path) -> LoaderResult<()> {
        let people = Source::from_path(path, None)?;
        let orgs = Source::from_path(orgs_path, None)?;
        debug!(orgs = %orgs_path.display(), "loaded orgs document for people");
        Ok(self.validate_people(&people, &orgs)?)
    }

    pub fn validate_orgs_file(&self, path: &Path) -> LoaderResult<()> {
        Ok(self.validate_orgs(&Source::from_path(path, None)?)?)
    }

    pub fn validate_labels_file(&self, path: &Path) -> LoaderResult<()> {
        Ok(self.validate_labels(&Source::from_path(path, None)?)?)
    }

    /// Validate an export file, in `encoding` or the configured default
    pub fn validate_salesforce_export_file(&self, path: &Path, encoding: Option<&str>) -> LoaderResult<()> {
        let encoding = encoding.unwrap_or(&self.config.salesforce_encoding);
        Ok(self.validate_salesforce_export(&Source::from_path(path, Some(encoding))?)?)
    }

    /// Validate a file of the given kind, detected from its name when `None`
    pub fn validate_file(&self, path: &Path, kind: Option<DocumentKind>) -> LoaderResult<DocumentKind> {
        let kind = match kind {
            Some(kind) => kind,
            None => DocumentKind::detect(path)?,
        };

        match kind {
            DocumentKind::People => self.validate_people_file(path)?,
            DocumentKind::Orgs => self.validate_orgs_file(path)?,
            DocumentKind::Labels => self.validate_labels_file(path)?,
            DocumentKind::SalesforceExport => self.validate_salesforce_export_file(path, None)?,
        }
        info!(path = %path.display(), kind = %kind, "document is valid");
        Ok(kind)
    }

    /// Validate several files independently, one outcome per file
    ///
    /// Read errors stop the batch. Validation failures are recorded, and with
    /// `fail_fast` the batch ends after the first one.
    pub fn validate_files(
        &self,
        files: &[(PathBuf, DocumentKind)],
        fail_fast: bool,
    ) -> LoaderResult<Vec<FileOutcome>> {
        let mut outcomes = Vec::with_capacity(files.len());
        for (path, kind) in files {
            let error = match self.validate_file(path, Some(*kind)) {
                Ok(_) => None,
                Err(LoaderError::Validation(error)) => Some(error),
                Err(other) => return Err(other),
            };
            let failed = error.is_some();
            outcomes.push(FileOutcome {
                path: path.clone(),
                kind: *kind,
                error,
            });
            if failed && fail_fast {
                break;
            }
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    const ORGS: &str = "acme:\n  name: Acme Corp\n  agreement: institution\n";

    #[test]
    fn test_people_against_orgs_display_name() {
        let people = Source::new(
            "people.yaml",
            "wile:\n  name: Wile E\n  email: wile@acme.example\n  agreement: institution\n  institution: Acme Corp\n",
        );
        let engine = ValidationEngine::default();
        assert!(engine.validate_people(&people, &Source::new("orgs.yaml", ORGS)).is_ok());
    }

    #[test]
    fn test_duplicate_in_orgs_is_reported_for_orgs() {
        let people = Source::new("people.yaml", "");
        let orgs = Source::new("orgs.yaml", "acme:\n  agreement: none\nacme:\n  agreement: none\n");
        let err = ValidationEngine::default().validate_people(&people, &orgs).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Consistency);
        assert_eq!(err.document.as_deref(), Some("orgs.yaml"));
    }

    #[test]
    fn test_people_file_loads_sibling_orgs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("orgs.yaml"), ORGS).unwrap();
        let people_path = dir.path().join("people.yaml");
        fs::write(
            &people_path,
            "wile:\n  name: Wile E\n  email: wile@acme.example\n  agreement: institution\n  institution: Initech\n",
        )
        .unwrap();

        let err = ValidationEngine::default().validate_people_file(&people_path).unwrap_err();
        let validation = err.as_validation().unwrap();
        assert_eq!(validation.kind, ErrorKind::Reference);
        assert_eq!(validation.message, "Institution 'Initech' isn't in orgs.yaml");
    }

    #[test]
    fn test_people_file_without_orgs() {
        let dir = TempDir::new().unwrap();
        let people_path = dir.path().join("people.yaml");
        fs::write(&people_path, "").unwrap();

        let err = ValidationEngine::default().validate_people_file(&people_path).unwrap_err();
        assert!(matches!(err, LoaderError::IoError { .. }));
        assert!(err.path().unwrap().ends_with("orgs.yaml"));
    }

    #[test]
    fn test_validate_file_detects_kind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("labels.yaml");
        fs::write(&path, "bug:\n  color: d73a4a\n").unwrap();

        let kind = ValidationEngine::default().validate_file(&path, None).unwrap();
        assert_eq!(kind, DocumentKind::Labels);
    }

    #[test]
    fn test_validate_files_collects_failures() {
        let dir = TempDir::new().unwrap();
        let labels = dir.path().join("labels.yaml");
        let orgs = dir.path().join("orgs.yaml");
        fs::write(&labels, "b:\n  delete: true\na:\n  delete: true\n").unwrap();
        fs::write(&orgs, "acme:\n  agreement: maybe\n").unwrap();

        let files = vec![(labels, DocumentKind::Labels), (orgs, DocumentKind::Orgs)];
        let engine = ValidationEngine::default();

        let outcomes = engine.validate_files(&files, false).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].is_valid());
        let errors = batch_errors(&outcomes);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors[0].kind, ErrorKind::Ordering);
        assert_eq!(errors.errors[1].kind, ErrorKind::Format);

        let outcomes = engine.validate_files(&files, true).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].kind, DocumentKind::Labels);
    }

    #[test]
    fn test_validate_files_reports_passing_files() {
        let dir = TempDir::new().unwrap();
        let orgs = dir.path().join("orgs.yaml");
        fs::write(&orgs, ORGS).unwrap();

        let outcomes = ValidationEngine::default()
            .validate_files(&[(orgs.clone(), DocumentKind::Orgs)], true)
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_valid());
        assert_eq!(outcomes[0].path, orgs);
        assert!(batch_errors(&outcomes).is_empty());
    }
}
