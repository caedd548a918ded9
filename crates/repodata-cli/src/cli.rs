//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use repodata_schemas::DocumentKind;
use std::path::PathBuf;

/// Repodata CLI - validate repository contributor data files
///
/// Checks people.yaml, orgs.yaml, labels.yaml and the CLA export for schema
/// violations, unresolved references, duplicate keys and unsorted entries.
#[derive(Parser, Debug)]
#[command(
    name = "repodata",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "REPODATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate one data file
    Validate(ValidateArgs),

    /// Validate every data file present in a directory
    Check(CheckArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the data file (people, orgs or labels YAML, or a CSV export)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Document kind, detected from the file name when omitted
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,

    /// Orgs file to resolve institutions against (people only)
    #[arg(long, value_name = "ORGS_FILE")]
    pub orgs: Option<PathBuf>,

    /// Text encoding of a CSV export
    #[arg(long)]
    pub encoding: Option<String>,

    /// Confirm that every granted repository exists on GitHub
    #[arg(long)]
    pub check_repos: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Data directory (defaults to the configured data directory)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Stop at the first failing file
    #[arg(long)]
    pub fail_fast: bool,

    /// Confirm that every granted repository exists on GitHub
    #[arg(long)]
    pub check_repos: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show current configuration values
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file
    #[arg(long, default_value = ".repodata.toml")]
    pub path: PathBuf,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Document kinds accepted by `--kind`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// people.yaml
    People,
    /// orgs.yaml
    Orgs,
    /// labels.yaml
    Labels,
    /// CSV export of CLA signers
    Salesforce,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::People => DocumentKind::People,
            KindArg::Orgs => DocumentKind::Orgs,
            KindArg::Labels => DocumentKind::Labels,
            KindArg::Salesforce => DocumentKind::SalesforceExport,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify that the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: OutputFormat::Human,
            no_color: false,
            command: Commands::Validate(ValidateArgs {
                file: PathBuf::from("people.yaml"),
                kind: None,
                orgs: None,
                encoding: None,
                check_repos: false,
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::parse_from([
            "repodata", "-vv", "validate", "data/people.yaml", "--orgs", "data/orgs.yaml", "--check-repos",
        ]);
        assert_eq!(cli.verbosity_level(), 2);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.file, PathBuf::from("data/people.yaml"));
                assert_eq!(args.orgs, Some(PathBuf::from("data/orgs.yaml")));
                assert!(args.check_repos);
                assert!(args.kind.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_kind_and_check() {
        let cli = Cli::parse_from(["repodata", "validate", "export.txt", "--kind", "salesforce"]);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.kind.map(DocumentKind::from), Some(DocumentKind::SalesforceExport));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["repodata", "--quiet", "check", "--fail-fast"]);
        assert!(matches!(cli.command, Commands::Check(CheckArgs { dir: None, fail_fast: true, .. })));
    }
}
