//! Entry point of the navigator.
//!
//! A [`WorkspaceResolver`] owns the workspace root and answers one
//! [`NavRequest`] at a time:
//!
//! ```text
//! NavRequest ──▶ resolve_target ──▶ directory ──▶ DirectoryLister
//!                 (sandboxed)   └──▶ .go file  ──▶ SourceFileAnalyzer
//!                               └──▶ other     ──▶ []
//! ```
//!
//! Nothing is cached between requests; every call reads the filesystem
//! afresh.

mod listing;
mod package;

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::analysis::{SourceFileAnalyzer, GO_EXTENSION};
use crate::error::NavError;
use crate::node::Node;

pub use listing::DirectoryLister;
pub use package::{
    GoPackage, PackageError, PackageResolver, SourcePackageResolver, MAIN_PACKAGE,
};

/// Parameters of a single navigation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavRequest {
    /// Path relative to the workspace root; the root itself when absent.
    pub target: Option<String>,
    /// Receiver type whose methods are wanted (source files only).
    pub receiver: Option<String>,
}

impl NavRequest {
    /// Build a request, treating empty strings as absent.
    pub fn new(target: Option<String>, receiver: Option<String>) -> Self {
        Self {
            target: target.filter(|t| !t.is_empty()),
            receiver: receiver.filter(|r| !r.is_empty()),
        }
    }
}

/// Resolves requests against a fixed workspace root.
pub struct WorkspaceResolver {
    root: PathBuf,
    packages: Box<dyn PackageResolver>,
    analyzer: SourceFileAnalyzer,
}

impl WorkspaceResolver {
    /// Resolver over `root`, which should be absolute.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            packages: Box::new(SourcePackageResolver::new()),
            analyzer: SourceFileAnalyzer::new(),
        }
    }

    /// Replace the build-introspection collaborator.
    pub fn with_package_resolver(mut self, packages: impl PackageResolver + 'static) -> Self {
        self.packages = Box::new(packages);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Answer one request.
    pub fn resolve(&self, request: &NavRequest) -> Result<Vec<Node>, NavError> {
        let target = self.resolve_target(request.target.as_deref())?;
        debug!(
            target = %target.display(),
            receiver = request.receiver.as_deref().unwrap_or(""),
            "resolving"
        );

        let meta = fs::metadata(&target).map_err(|source| NavError::NotFound {
            path: target.clone(),
            source,
        })?;

        if meta.is_dir() {
            return DirectoryLister::new(&self.root, self.packages.as_ref()).list(&target);
        }

        if target.extension().and_then(|e| e.to_str()) == Some(GO_EXTENSION) {
            return self
                .analyzer
                .analyze(&self.root, &target, request.receiver.as_deref());
        }

        debug!(target = %target.display(), "not a directory or Go source file");
        Ok(Vec::new())
    }

    /// Join `relative` onto the root without ever leaving it.
    ///
    /// Leading separators, `.` components and drive prefixes are dropped;
    /// a `..` that would climb above the root is rejected.
    pub fn resolve_target(&self, relative: Option<&str>) -> Result<PathBuf, NavError> {
        let Some(relative) = relative else {
            return Ok(self.root.clone());
        };

        let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(NavError::OutsideRoot {
                            relative: relative.to_string(),
                        });
                    }
                }
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
        }

        let mut target = self.root.clone();
        target.extend(parts);
        Ok(target)
    }
}
