//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with dedicated
//! rendering for validation failures and per-file reports.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use repodata_schemas::{DocumentKind, FileOutcome, ValidationError};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Outcome of validating a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// File that was validated
    pub path: PathBuf,
    /// Which document it was validated as
    pub kind: String,
    /// Whether the document passed
    pub valid: bool,
    /// The first failure, when it didn't
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

impl FileReport {
    pub fn passed(path: &Path, kind: DocumentKind) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: kind.as_str().to_string(),
            valid: true,
            error: None,
        }
    }

    pub fn failed(path: &Path, kind: DocumentKind, error: ValidationError) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: kind.as_str().to_string(),
            valid: false,
            error: Some(error),
        }
    }
}

impl From<FileOutcome> for FileReport {
    fn from(outcome: FileOutcome) -> Self {
        match outcome.error {
            Some(error) => Self::failed(&outcome.path, outcome.kind, error),
            None => Self::passed(&outcome.path, outcome.kind),
        }
    }
}

/// Results of a `check` run over a data directory
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Data directory that was checked
    pub dir: PathBuf,
    /// One entry per document found
    pub files: Vec<FileReport>,
    /// Documents that weren't present
    pub skipped: Vec<PathBuf>,
}

impl CheckReport {
    /// Number of failing documents
    pub fn failures(&self) -> usize {
        self.files.iter().filter(|file| !file.valid).count()
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a single validation error
    fn format_validation_error(&self, error: &ValidationError) -> Result<String>;

    /// Format the report of a `check` run
    fn format_check_report(&self, report: &CheckReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_validation_error(&self, error: &ValidationError) -> Result<String> {
        match self {
            OutputFormat::Human => format_validation_error_human(error),
            _ => self.format(error),
        }
    }

    fn format_check_report(&self, report: &CheckReport) -> Result<String> {
        match self {
            OutputFormat::Human => format_check_report_human(report),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a detail shown only with `-v`
    pub fn detail(&mut self, message: &str) -> Result<()> {
        if self.verbose == 0 || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.dimmed().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write data in the configured format, with secrets redacted
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut value_json = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value_json);
        trace!("Outputting data: {}", value_json);

        let formatted = self.format.format(&value_json)?;
        self.writeln(formatted.trim_end())
    }

    /// Write the outcome of validating one file
    ///
    /// Human output only shows failures; machine formats always emit the report.
    pub fn file_report(&mut self, report: &FileReport) -> Result<()> {
        match (self.format, &report.error) {
            (OutputFormat::Human, Some(error)) => self.validation_error(error),
            (OutputFormat::Human, None) => Ok(()),
            _ => self.data(report),
        }
    }

    /// Write a `check` report
    pub fn check_report(&mut self, report: &CheckReport) -> Result<()> {
        if self.format == OutputFormat::Human && self.quiet && report.failures() == 0 {
            return Ok(());
        }
        let formatted = self.format.format_check_report(report)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a single validation error
    pub fn validation_error(&mut self, error: &ValidationError) -> Result<()> {
        let formatted = self.format.format_validation_error(error)?;
        let formatted = formatted.trim_end();
        if self.use_color && self.format == OutputFormat::Human {
            self.writeln(&formatted.red().to_string())
        } else {
            self.writeln(formatted)
        }
    }
}

/// Format a single validation error for human reading
fn format_validation_error_human(error: &ValidationError) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("✗ {} error", error.kind));
    if let Some(document) = &error.document {
        output.push_str(&format!(" in {}", document));
    }
    output.push('\n');
    output.push_str(&format!("📍 Path: {}\n", error.path));
    output.push_str(&format!("💬 Message: {}\n", error.message));

    if !error.schema_violations.is_empty() {
        output.push_str("🔍 Details:\n");

        for violation in &error.schema_violations {
            output.push_str(&format!("  • Rule: {}\n", violation.rule));
            output.push_str(&format!("    Expected: {}\n", indent_continuation(&violation.expected)));
            output.push_str(&format!("    Actual: {}\n", indent_continuation(&violation.actual)));
        }
    }

    Ok(output)
}

/// Format a `check` report for human reading
fn format_check_report_human(report: &CheckReport) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("═══ {} ═══\n", report.dir.display()));
    for file in &report.files {
        let name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.path.display().to_string());
        if file.valid {
            output.push_str(&format!("✓ {} ({})\n", name, file.kind));
        } else {
            output.push_str(&format!("✗ {} ({})\n", name, file.kind));
        }
    }
    for skipped in &report.skipped {
        output.push_str(&format!("- {} (not present)\n", skipped.display()));
    }

    let failed: Vec<&ValidationError> = report.files.iter().filter_map(|f| f.error.as_ref()).collect();
    if !failed.is_empty() {
        output.push('\n');
        for (i, error) in failed.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, format_validation_error_human(error)?));
        }
    }

    output.push_str(&format!(
        "{} of {} document(s) valid\n",
        report.files.len() - report.failures(),
        report.files.len()
    ));

    Ok(output)
}

/// Indent the continuation lines of a multi-line value
fn indent_continuation(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\n      ")
}
