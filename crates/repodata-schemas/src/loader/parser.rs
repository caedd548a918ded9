//! Document kind detection and text decoding
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use encoding_rs::Encoding;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::trace;

/// The four document kinds this crate validates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    People,
    Orgs,
    Labels,
    SalesforceExport,
}

impl DocumentKind {
    /// Detect the kind from a file name such as `people.yaml` or `export.csv`
    pub fn detect(path: &Path) -> LoaderResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_deref() {
            Some("csv") => Ok(DocumentKind::SalesforceExport),
            Some("yaml") | Some("yml") => {
                if stem.starts_with("people") {
                    Ok(DocumentKind::People)
                } else if stem.starts_with("orgs") {
                    Ok(DocumentKind::Orgs)
                } else if stem.starts_with("labels") {
                    Ok(DocumentKind::Labels)
                } else {
                    Err(LoaderError::undetectable_kind(path))
                }
            }
            _ => Err(LoaderError::undetectable_kind(path)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::People => "people",
            DocumentKind::Orgs => "orgs",
            DocumentKind::Labels => "labels",
            DocumentKind::SalesforceExport => "salesforce",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "people" => Ok(DocumentKind::People),
            "orgs" => Ok(DocumentKind::Orgs),
            "labels" => Ok(DocumentKind::Labels),
            "salesforce" | "export" => Ok(DocumentKind::SalesforceExport),
            other => Err(format!("unknown document kind '{}'", other)),
        }
    }
}

/// Read a file as text in the named encoding, UTF-8 when `None`
///
/// A leading byte-order mark for the encoding is removed. Bytes that are not
/// valid in the encoding are an error rather than replaced.
pub fn read_text(path: &Path, encoding: Option<&str>) -> LoaderResult<String> {
    let label = encoding.unwrap_or("utf-8");
    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| LoaderError::unknown_encoding(label, path))?;

    let bytes = std::fs::read(path).map_err(|e| LoaderError::io_error(path, e))?;
    let (text, had_errors) = encoding.decode_with_bom_removal(&bytes);
    if had_errors {
        return Err(LoaderError::io_error(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("file is not valid {}", encoding.name()),
            ),
        ));
    }

    trace!(path = %path.display(), encoding = encoding.name(), bytes = bytes.len(), "read document");
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_kind() {
        assert_eq!(DocumentKind::detect(Path::new("people.yaml")).unwrap(), DocumentKind::People);
        assert_eq!(DocumentKind::detect(Path::new("/repo/orgs.yml")).unwrap(), DocumentKind::Orgs);
        assert_eq!(DocumentKind::detect(Path::new("labels-core.yaml")).unwrap(), DocumentKind::Labels);
        assert_eq!(
            DocumentKind::detect(Path::new("Contacts Export.CSV")).unwrap(),
            DocumentKind::SalesforceExport
        );
        assert!(DocumentKind::detect(Path::new("teams.yaml")).is_err());
        assert!(DocumentKind::detect(Path::new("people.json")).is_err());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Orgs".parse::<DocumentKind>().unwrap(), DocumentKind::Orgs);
        assert_eq!("salesforce".parse::<DocumentKind>().unwrap(), DocumentKind::SalesforceExport);
        assert!("teams".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_read_cp1252() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Jos\xe9").unwrap();

        assert_eq!(read_text(file.path(), Some("cp1252")).unwrap(), "José");
        assert!(read_text(file.path(), None).is_err());
    }

    #[test]
    fn test_read_utf8_strips_bom() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("\u{feff}a: 1\n".as_bytes()).unwrap();
        assert_eq!(read_text(file.path(), None).unwrap(), "a: 1\n");
    }

    #[test]
    fn test_unknown_encoding() {
        let file = NamedTempFile::new().unwrap();
        let err = read_text(file.path(), Some("klingon")).unwrap_err();
        assert!(matches!(err, LoaderError::UnknownEncoding { .. }));
    }
}
