//! Error types for fxl2html conversions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a conversion.
///
/// Anything not listed here (missing stylesheet or asset directories,
/// unresolvable asset references) degrades gracefully instead of failing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{} is not a readable EPUB archive: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("no page-<N>.xhtml files found in {}", .path.display())]
    Layout { path: PathBuf },

    #[error("none of the {pages} page files in {} has a non-empty body", .path.display())]
    EmptyResult { path: PathBuf, pages: usize },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
