//! Errors surfaced by the navigator core.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single navigation request.
///
/// Every variant aborts the request; no partial node list is ever returned
/// alongside an error.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("path {relative:?} escapes the workspace root")]
    OutsideRoot { relative: String },

    #[error("stat {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read directory {}: {source}", path.display())]
    ListError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `message` carries the parser diagnostic, prefixed by `line:col`.
    #[error("{}:{message}", path.display())]
    ParseError { path: PathBuf, message: String },
}

impl NavError {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavError::OutsideRoot { .. } => "outside-root",
            NavError::NotFound { .. } => "not-found",
            NavError::ListError { .. } => "list-error",
            NavError::ReadError { .. } => "read-error",
            NavError::ParseError { .. } => "parse-error",
        }
    }
}
