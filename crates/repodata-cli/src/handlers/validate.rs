//! Validation command handler

use super::build_engine;
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{FileReport, OutputWriter};
use repodata_schemas::{DocumentKind, LoaderError};
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip(config, output), fields(file = %args.file.display(), kind = ?args.kind))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &format!("file: {}", args.file.display()));

    if !args.file.exists() {
        return Err(Error::FileNotFound { path: args.file });
    }

    let kind = match args.kind {
        Some(kind) => DocumentKind::from(kind),
        None => DocumentKind::detect(&args.file)?,
    };
    debug!(kind = %kind, "validating document");

    if args.orgs.is_some() && kind != DocumentKind::People {
        return Err(Error::invalid_args("--orgs only applies to people documents"));
    }
    if args.encoding.is_some() && kind != DocumentKind::SalesforceExport {
        return Err(Error::invalid_args("--encoding only applies to CSV exports"));
    }

    output.info(&format!("Validating {} as {}", args.file.display(), kind))?;

    let engine = build_engine(config, args.check_repos || config.github.check_repos, output)?;
    let result = match (kind, &args.orgs) {
        (DocumentKind::People, Some(orgs)) => {
            output.detail(&format!("Institutions resolved against {}", orgs.display()))?;
            engine.validate_people_file_with_orgs(&args.file, orgs)
        }
        (DocumentKind::People, None) => {
            let orgs = engine.sibling_orgs_path(&args.file);
            output.detail(&format!("Institutions resolved against {}", orgs.display()))?;
            engine.validate_people_file_with_orgs(&args.file, &orgs)
        }
        (DocumentKind::SalesforceExport, None) => {
            engine.validate_salesforce_export_file(&args.file, args.encoding.as_deref())
        }
        _ => engine.validate_file(&args.file, Some(kind)).map(|_| ()),
    };

    match result {
        Ok(()) => {
            info!("Validation completed successfully");
            output.file_report(&FileReport::passed(&args.file, kind))?;
            output.success(&format!("✓ {} is valid", args.file.display()))?;
            Ok(())
        }
        Err(LoaderError::Validation(error)) => {
            warn!(kind = %error.kind, path = %error.path, "validation failed");
            output.error(&format!("✗ {} failed validation", args.file.display()))?;
            output.file_report(&FileReport::failed(&args.file, kind, error.clone()))?;
            Err(Error::Validation(error))
        }
        Err(other) => Err(other.into()),
    }
}
