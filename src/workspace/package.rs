//! Recognition of Go package directories.
//!
//! A directory is a package when its buildable `.go` files agree on a single
//! package name. The rules follow what `go build` considers part of a package:
//! - files starting with `.` or `_` are ignored
//! - `*_test.go` files are ignored
//! - files carrying an `ignore` build constraint are ignored
//! - files declaring `package documentation` are ignored

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::analysis::{GoAnalyzer, GO_EXTENSION};

/// Package name of command (executable) packages.
pub const MAIN_PACKAGE: &str = "main";

/// Package name reserved for documentation-only files.
const DOCUMENTATION_PACKAGE: &str = "documentation";

/// Why a directory is not a Go package.
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("no buildable Go source files in {}", dir.display())]
    NoGoFiles { dir: PathBuf },

    #[error("found packages {} in {}", names.join(", "), dir.display())]
    MultiplePackages { dir: PathBuf, names: Vec<String> },

    #[error("{}: expected 'package'", path.display())]
    NoPackageClause { path: PathBuf },

    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A directory recognized as a Go package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoPackage {
    pub name: String,
}

impl GoPackage {
    /// True for package `main`, which builds into an executable.
    pub fn is_command(&self) -> bool {
        self.name == MAIN_PACKAGE
    }
}

/// Build introspection for a single directory.
///
/// Implementations must be safe to share across request threads.
pub trait PackageResolver: Send + Sync {
    fn resolve(&self, dir: &Path) -> Result<GoPackage, PackageError>;
}

/// Resolves packages by reading the `package` clause of each source file.
#[derive(Clone, Default)]
pub struct SourcePackageResolver {
    analyzer: GoAnalyzer,
}

impl SourcePackageResolver {
    pub fn new() -> Self {
        Self {
            analyzer: GoAnalyzer::new(),
        }
    }

    fn package_clause(&self, path: &Path, source: &[u8]) -> Result<String, PackageError> {
        let parsed = self
            .analyzer
            .parse(path, source)
            .map_err(|_| PackageError::NoPackageClause {
                path: path.to_path_buf(),
            })?;
        self.analyzer
            .package_name(&parsed)
            .ok_or_else(|| PackageError::NoPackageClause {
                path: path.to_path_buf(),
            })
    }
}

impl PackageResolver for SourcePackageResolver {
    fn resolve(&self, dir: &Path) -> Result<GoPackage, PackageError> {
        let mut name: Option<String> = None;
        let mut conflicting = Vec::new();

        for entry in fs::read_dir(dir).map_err(io_err(dir))? {
            let entry = entry.map_err(io_err(dir))?;
            let path = entry.path();
            if !is_candidate(&path) || !entry.file_type().map_err(io_err(&path))?.is_file() {
                continue;
            }

            let source = fs::read(&path).map_err(io_err(&path))?;
            if has_ignore_constraint(&String::from_utf8_lossy(&source)) {
                continue;
            }

            let pkg = self.package_clause(&path, &source)?;
            if pkg == DOCUMENTATION_PACKAGE {
                continue;
            }

            if name.is_none() {
                name = Some(pkg);
            } else if name.as_deref() != Some(pkg.as_str()) && !conflicting.contains(&pkg) {
                conflicting.push(pkg);
            }
        }

        let name = name.ok_or_else(|| PackageError::NoGoFiles {
            dir: dir.to_path_buf(),
        })?;
        if !conflicting.is_empty() {
            let mut names = vec![name];
            names.extend(conflicting);
            return Err(PackageError::MultiplePackages {
                dir: dir.to_path_buf(),
                names,
            });
        }

        Ok(GoPackage { name })
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PackageError {
    let path = path.to_path_buf();
    move |source| PackageError::Io { path, source }
}

/// File name rules for buildable sources.
fn is_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let is_go = path.extension().and_then(|e| e.to_str()) == Some(GO_EXTENSION);
    is_go && !name.starts_with('.') && !name.starts_with('_') && !name.ends_with("_test.go")
}

/// Whether the header of a file excludes it from every build.
///
/// Only the `ignore` tag is evaluated: `//go:build ignore` or a
/// `// +build` line with an `ignore` option. Other constraints (GOOS,
/// GOARCH, release tags) are assumed satisfied.
fn has_ignore_constraint(source: &str) -> bool {
    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(comment) = line.strip_prefix("//") else {
            // constraints must precede the package clause
            return false;
        };
        if let Some(expr) = comment.strip_prefix("go:build") {
            if expr.trim() == "ignore" {
                return true;
            }
        } else if let Some(options) = comment.trim_start().strip_prefix("+build") {
            if options.split_whitespace().any(|opt| opt == "ignore") {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dir_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_library_package() {
        let dir = dir_with(&[
            ("a.go", "package shapes\n"),
            ("b.go", "package shapes\n\nfunc B() {}\n"),
            ("a_test.go", "package shapes_test\n"),
        ]);
        let pkg = SourcePackageResolver::new().resolve(dir.path()).unwrap();
        assert_eq!(pkg.name, "shapes");
        assert!(!pkg.is_command());
    }

    #[test]
    fn test_main_package_is_command() {
        let dir = dir_with(&[("main.go", "package main\n\nfunc main() {}\n")]);
        let pkg = SourcePackageResolver::new().resolve(dir.path()).unwrap();
        assert!(pkg.is_command());
    }

    #[test]
    fn test_no_go_files() {
        let dir = dir_with(&[("README.md", "# docs\n"), ("only_test.go", "package x\n")]);
        let err = SourcePackageResolver::new().resolve(dir.path()).unwrap_err();
        assert!(matches!(err, PackageError::NoGoFiles { .. }));
    }

    #[test]
    fn test_conflicting_packages() {
        let dir = dir_with(&[("a.go", "package one\n"), ("b.go", "package two\n")]);
        let err = SourcePackageResolver::new().resolve(dir.path()).unwrap_err();
        match err {
            PackageError::MultiplePackages { mut names, .. } => {
                names.sort();
                assert_eq!(names, vec!["one", "two"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ignored_files_do_not_count() {
        let dir = dir_with(&[
            ("gen.go", "//go:build ignore\n\npackage main\n"),
            ("old.go", "// +build linux ignore\n\npackage other\n"),
            ("doc.go", "package documentation\n"),
            ("_skip.go", "package skipped\n"),
            ("lib.go", "package lib\n"),
        ]);
        let pkg = SourcePackageResolver::new().resolve(dir.path()).unwrap();
        assert_eq!(pkg.name, "lib");
    }

    #[test]
    fn test_missing_package_clause() {
        let dir = dir_with(&[("x.go", "func f() {}\n")]);
        let err = SourcePackageResolver::new().resolve(dir.path()).unwrap_err();
        assert!(matches!(err, PackageError::NoPackageClause { .. }));
    }

    #[test]
    fn test_ignore_constraint_stops_at_code() {
        assert!(has_ignore_constraint("// Code generated.\n//go:build ignore\n\npackage x\n"));
        assert!(!has_ignore_constraint("//go:build linux\n\npackage x\n"));
        assert!(!has_ignore_constraint("package x\n\n//go:build ignore\n"));
    }

    #[test]
    fn test_candidate_names() {
        assert!(is_candidate(Path::new("/p/main.go")));
        assert!(!is_candidate(Path::new("/p/main_test.go")));
        assert!(!is_candidate(Path::new("/p/.hidden.go")));
        assert!(!is_candidate(Path::new("/p/_tmp.go")));
        assert!(!is_candidate(Path::new("/p/notes.txt")));
    }
}
