//! Reading document files from disk
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;

pub use error::{LoaderError, LoaderResult};
pub use parser::{read_text, DocumentKind};

use std::path::Path;

/// Named document text handed to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Name used in messages, usually the file name
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, text: T) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a file, naming the source after its file name
    pub fn from_path(path: &Path, encoding: Option<&str>) -> LoaderResult<Self> {
        let text = read_text(path, encoding)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, text })
    }
}
