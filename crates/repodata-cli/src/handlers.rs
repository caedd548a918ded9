//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod check;
mod completions;
mod config;
mod validate;

pub use check::handle_check;
pub use completions::handle_completions;
pub use config::handle_config;
pub use validate::handle_validate;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use repodata_schemas::{GitHubRepoLookup, ValidationEngine};
use tracing::debug;

/// Build the validation engine for a command
///
/// With `check_repos`, granted repositories are confirmed against GitHub.
fn build_engine(config: &Config, check_repos: bool, output: &mut OutputWriter) -> Result<ValidationEngine> {
    let engine = ValidationEngine::new(config.engine_config());
    if !check_repos {
        return Ok(engine);
    }

    let token = config.github.resolved_token();
    if token.is_none() {
        output.warning("No GitHub token configured; repository checks may hit the anonymous rate limit")?;
    }
    debug!(
        api_url = %config.github.api_url,
        authenticated = token.is_some(),
        "checking repositories against GitHub"
    );
    let lookup = GitHubRepoLookup::new(config.github.api_url.clone(), token, config.github.timeout())
        .map_err(|e| Error::config(format!("Failed to create GitHub client: {}", e)))?;
    Ok(engine.with_repo_lookup(Box::new(lookup)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, true, 0, Box::new(std::io::sink()))
    }

    #[test]
    fn test_engine_uses_configured_names() {
        let mut config = Config::default();
        config.data.orgs_file = "organizations.yaml".to_string();
        let engine = build_engine(&config, false, &mut quiet_output()).unwrap();
        assert_eq!(engine.config().orgs_file_name, "organizations.yaml");
    }

    #[test]
    fn test_engine_with_repo_checks() {
        let engine = build_engine(&Config::default(), true, &mut quiet_output()).unwrap();
        assert_eq!(engine.config().salesforce_encoding, "cp1252");
    }
}
