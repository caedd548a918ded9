//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Environment variables
//! - Command-line arguments

use crate::error::{Error, Result};
use repodata_schemas::github::DEFAULT_API_URL;
use repodata_schemas::{EngineConfig, DEFAULT_EXPORT_ENCODING, DEFAULT_ORGS_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable consulted when no token is configured
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the data documents live
    pub data: DataConfig,

    /// Remote repository checks
    pub github: GitHubConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Data directory layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the documents
    pub dir: PathBuf,

    /// People document name
    pub people_file: String,

    /// Orgs document name
    pub orgs_file: String,

    /// Labels document name
    pub labels_file: String,

    /// CLA export, relative to `dir`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salesforce_export: Option<PathBuf>,

    /// Text encoding of the export
    pub salesforce_encoding: String,
}

/// GitHub API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Check granted repositories by default
    pub check_repos: bool,

    /// API root
    pub api_url: String,

    /// API token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            people_file: "people.yaml".to_string(),
            orgs_file: DEFAULT_ORGS_FILE.to_string(),
            labels_file: "labels.yaml".to_string(),
            salesforce_export: None,
            salesforce_encoding: DEFAULT_EXPORT_ENCODING.to_string(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            check_repos: false,
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
        }
    }
}

impl GitHubConfig {
    /// The configured token, or `GITHUB_TOKEN` from the environment
    pub fn resolved_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var(GITHUB_TOKEN_ENV).ok())
            .filter(|token| !token.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };

        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// The first user-level file is read, then the first project file in the
    /// working directory is merged over it.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(user) = Self::first_loadable(&Self::user_config_paths()) {
            config.merge(user);
        }
        if let Some(project) = Self::first_loadable(&Self::project_config_paths()) {
            config.merge(project);
        }

        Ok(config)
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    fn first_loadable(paths: &[PathBuf]) -> Option<Self> {
        for path in paths {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return Some(config),
                    Err(e) => warn!("Failed to load config from {}: {}", path.display(), e),
                }
            }
        }
        None
    }

    /// Project configuration files, in lookup order
    pub fn project_config_paths() -> Vec<PathBuf> {
        [".repodata.yaml", ".repodata.yml", ".repodata.json", ".repodata.toml"]
            .into_iter()
            .map(PathBuf::from)
            .collect()
    }

    /// User configuration files, in lookup order
    pub fn user_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            let repodata_dir = config_dir.join("repodata");
            paths.push(repodata_dir.join("config.yaml"));
            paths.push(repodata_dir.join("config.json"));
            paths.push(repodata_dir.join("config.toml"));
        }
        paths
    }

    /// Merge with another config (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        let token = other.github.token.clone().or_else(|| self.github.token.take());
        let level = other.logging.level.clone().or_else(|| self.logging.level.take());

        self.data = other.data;
        self.github = other.github;
        self.github.token = token;
        self.output = other.output;
        self.logging = other.logging;
        self.logging.level = level;
    }

    /// Path of the people document
    pub fn people_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.data.people_file)
    }

    /// Path of the orgs document
    pub fn orgs_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.data.orgs_file)
    }

    /// Path of the labels document
    pub fn labels_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.data.labels_file)
    }

    /// Path of the CLA export, when one is configured
    pub fn salesforce_export_path(&self, dir: &Path) -> Option<PathBuf> {
        self.data.salesforce_export.as_ref().map(|export| dir.join(export))
    }

    /// Settings handed to the validation engine
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            orgs_file_name: self.data.orgs_file.clone(),
            salesforce_encoding: self.data.salesforce_encoding.clone(),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(self)?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
            _ => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data.dir, PathBuf::from("."));
        assert_eq!(config.data.orgs_file, "orgs.yaml");
        assert_eq!(config.data.salesforce_encoding, "cp1252");
        assert_eq!(config.github.timeout(), Duration::from_secs(30));
        assert!(!config.github.check_repos);
        assert!(config.output.color);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".repodata.yaml");
        std::fs::write(&path, "data:\n  dir: registry\ngithub:\n  check_repos: true\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data.dir, PathBuf::from("registry"));
        assert_eq!(config.data.people_file, "people.yaml");
        assert!(config.github.check_repos);
        assert_eq!(config.github.api_url, "https://api.github.com");
    }

    #[test]
    fn test_toml_and_json_files() {
        let dir = TempDir::new().unwrap();
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&toml_path, "[data]\norgs_file = \"organizations.yaml\"\n").unwrap();
        assert_eq!(
            Config::from_file(&toml_path).unwrap().engine_config().orgs_file_name,
            "organizations.yaml"
        );

        let json_path = dir.path().join("config.json");
        std::fs::write(&json_path, r#"{"output": {"color": false}}"#).unwrap();
        assert!(!Config::from_file(&json_path).unwrap().output.color);
    }

    #[test]
    fn test_bad_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data = [").unwrap();
        assert_eq!(Config::from_file(&path).unwrap_err().exit_code(), 14);

        let missing = Config::from_file(&dir.path().join("absent.yaml")).unwrap_err();
        assert_eq!(missing.exit_code(), 3);
    }

    #[test]
    fn test_save_round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(".repodata.toml");
        let mut config = Config::default();
        config.data.salesforce_export = Some(PathBuf::from("contacts.csv"));

        config.save(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_merge_keeps_token_unless_overridden() {
        let mut base = Config::default();
        base.github.token = Some("from-user-config".to_string());

        let mut project = Config::default();
        project.data.dir = PathBuf::from("data");
        base.merge(project);
        assert_eq!(base.data.dir, PathBuf::from("data"));
        assert_eq!(base.github.token.as_deref(), Some("from-user-config"));

        let mut other = Config::default();
        other.github.token = Some("from-project".to_string());
        base.merge(other);
        assert_eq!(base.github.token.as_deref(), Some("from-project"));
    }

    #[test]
    fn test_document_paths() {
        let mut config = Config::default();
        let dir = Path::new("registry");
        assert_eq!(config.people_path(dir), PathBuf::from("registry/people.yaml"));
        assert_eq!(config.orgs_path(dir), PathBuf::from("registry/orgs.yaml"));
        assert_eq!(config.labels_path(dir), PathBuf::from("registry/labels.yaml"));
        assert!(config.salesforce_export_path(dir).is_none());

        config.data.salesforce_export = Some(PathBuf::from("contacts.csv"));
        assert_eq!(
            config.salesforce_export_path(dir),
            Some(PathBuf::from("registry/contacts.csv"))
        );
    }
}
