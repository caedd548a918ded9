//! Check command handler: validates every document of a data directory

use super::build_engine;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{CheckReport, FileReport, OutputWriter};
use repodata_schemas::{batch_errors, DocumentKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Handle the check command
#[instrument(skip(config, output), fields(dir = ?args.dir, fail_fast = args.fail_fast))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::new("check_command");
    let dir = args.dir.unwrap_or_else(|| config.data.dir.clone());
    if !dir.is_dir() {
        return Err(Error::FileNotFound { path: dir });
    }

    let (present, skipped) = data_files(config, &dir);
    if present.is_empty() {
        return Err(Error::other(format!(
            "No data documents found in {}",
            dir.display()
        )));
    }
    output.info(&format!("Checking {} document(s) in {}", present.len(), dir.display()))?;

    let engine = build_engine(config, args.check_repos || config.github.check_repos, output)?;
    let outcomes = engine.validate_files(&present, args.fail_fast)?;
    let errors = batch_errors(&outcomes);

    let report = CheckReport {
        dir,
        files: outcomes.into_iter().map(FileReport::from).collect(),
        skipped,
    };
    output.check_report(&report)?;
    info!(
        failures = report.failures(),
        duration_ms = timer.elapsed().as_millis() as u64,
        "check finished"
    );

    match errors.into_result() {
        Ok(()) => Ok(()),
        Err(errors) => Err(Error::ValidationBatch(errors)),
    }
}

/// Split the configured documents into present and missing files
fn data_files(config: &Config, dir: &Path) -> (Vec<(PathBuf, DocumentKind)>, Vec<PathBuf>) {
    let mut candidates = vec![
        (config.orgs_path(dir), DocumentKind::Orgs),
        (config.people_path(dir), DocumentKind::People),
        (config.labels_path(dir), DocumentKind::Labels),
    ];
    if let Some(export) = config.salesforce_export_path(dir) {
        candidates.push((export, DocumentKind::SalesforceExport));
    }

    let (present, missing): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|(path, _)| path.is_file());
    debug!(present = present.len(), missing = missing.len(), "found data documents");
    (present, missing.into_iter().map(|(path, _)| path).collect())
}
