//! CLA export validator for the Salesforce contributor report
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::validation::base::{SchemaValidator, ValidationContext};
use crate::validation::error::{ValidationError, ValidationResult};
use crate::validation::predicates::valid_github_username;
use tracing::{debug, instrument, trace};

/// Header of the export, in order
pub const EXPECTED_HEADER: &[&str] = &[
    "First Name",
    "Last Name",
    "Number of Active Ind. CLA Contracts",
    "Title",
    "Account Name",
    "Number of Active Entity CLA Contracts",
    "GitHub Username",
];

/// Account used by the CRM vendor for test contacts
pub const VENDOR_PLACEHOLDER_ACCOUNT: &str = "Opfocus Test";

const ACCOUNT_COLUMN: usize = 4;
const USERNAME_COLUMN: usize = 6;

/// Validator for the exported CSV text
#[derive(Debug, Default)]
pub struct SalesforceExportValidator;

impl SalesforceExportValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_header(&self, header: &csv::StringRecord, context: &ValidationContext) -> ValidationResult<()> {
        let found: Vec<&str> = header.iter().collect();
        if found == EXPECTED_HEADER {
            return Ok(());
        }

        Err(ValidationError::format(context, "Export header doesn't match the expected columns")
            .violation(ValidationError::create_violation(
                "csv_header",
                EXPECTED_HEADER.join(","),
                found.join(","),
            )))
    }
}

impl SchemaValidator for SalesforceExportValidator {
    type Input = str;

    #[instrument(skip_all, fields(document = context.document_name()))]
    fn validate_with_context(&self, input: &str, context: &ValidationContext) -> ValidationResult<()> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes());

        let header = reader
            .headers()
            .map_err(|e| ValidationError::format(context, format!("Malformed CSV header: {}", e)))?
            .clone();
        self.check_header(&header, context)?;

        let mut checked = 0usize;
        for (index, record) in reader.records().enumerate() {
            let row_context = context.child_index(index);
            let record = record
                .map_err(|e| ValidationError::format(&row_context, format!("Malformed CSV row: {}", e)))?;

            if record.get(ACCOUNT_COLUMN) == Some(VENDOR_PLACEHOLDER_ACCOUNT) {
                trace!(row = index, "skipping vendor placeholder row");
                continue;
            }

            let username = record.get(USERNAME_COLUMN).unwrap_or_default();
            if !valid_github_username(username) {
                return Err(ValidationError::format(
                    &row_context.child("GitHub Username"),
                    format!("GitHub Username is not valid: {}", username),
                ));
            }
            checked += 1;
        }

        debug!(rows = checked, "export is valid");
        Ok(())
    }
}
