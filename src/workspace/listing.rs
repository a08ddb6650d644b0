//! Classification of the immediate children of a directory.

use std::path::Path;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::analysis::GO_EXTENSION;
use crate::error::NavError;
use crate::node::{Node, NodeType};
use crate::workspace::package::PackageResolver;

/// Lists one directory of the workspace.
pub struct DirectoryLister<'a> {
    root: &'a Path,
    packages: &'a dyn PackageResolver,
}

impl<'a> DirectoryLister<'a> {
    pub fn new(root: &'a Path, packages: &'a dyn PackageResolver) -> Self {
        Self { root, packages }
    }

    /// One node per visible child of `dir`, in directory-read order.
    ///
    /// Hidden entries and non-Go files are skipped.
    pub fn list(&self, dir: &Path) -> Result<Vec<Node>, NavError> {
        let list_err = |source: walkdir::Error| NavError::ListError {
            path: dir.to_path_buf(),
            source: source.into(),
        };

        let at_root = dir == self.root;
        let dir_str = dir.to_string_lossy().to_string();
        let mut nodes = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(list_err)?;
            if !is_visible(&entry) {
                continue;
            }

            let is_dir = entry.file_type().is_dir();
            let node_type = if at_root {
                NodeType::TopLevel
            } else if is_dir {
                self.classify_dir(entry.path())
            } else {
                NodeType::SourceFile
            };
            let value = if is_dir {
                None
            } else {
                Some(entry.metadata().map_err(list_err)?.len())
            };

            let path = entry.path();
            nodes.push(Node::entry(
                node_type,
                path.to_string_lossy().to_string(),
                entry.file_name().to_string_lossy().to_string(),
                dir_str.clone(),
                crate::analysis::relative_loc(self.root, path),
                value,
            ));
        }

        debug!(dir = %dir.display(), entries = nodes.len(), "listed directory");
        Ok(nodes)
    }

    fn classify_dir(&self, path: &Path) -> NodeType {
        match self.packages.resolve(path) {
            Ok(pkg) if pkg.is_command() => NodeType::ExecutableUnit,
            Ok(_) => NodeType::CompilableUnit,
            Err(err) => {
                debug!(dir = %path.display(), reason = %err, "not a package");
                NodeType::Folder
            }
        }
    }
}

/// Hidden entries and regular files other than Go sources are not listed.
fn is_visible(entry: &DirEntry) -> bool {
    if entry.file_name().to_string_lossy().starts_with('.') {
        return false;
    }
    entry.file_type().is_dir()
        || entry.path().extension().and_then(|e| e.to_str()) == Some(GO_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::package::{GoPackage, PackageError};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Treats `cmd*` directories as commands and `lib*` as libraries.
    struct NamePrefixResolver;

    impl PackageResolver for NamePrefixResolver {
        fn resolve(&self, dir: &Path) -> Result<GoPackage, PackageError> {
            let base = dir.file_name().unwrap().to_string_lossy().to_string();
            let name = if base.starts_with("cmd") {
                "main".to_string()
            } else if base.starts_with("lib") {
                base
            } else {
                return Err(PackageError::NoGoFiles {
                    dir: dir.to_path_buf(),
                });
            };
            Ok(GoPackage { name })
        }
    }

    fn workspace() -> (TempDir, PathBuf) {
        let root = TempDir::new().unwrap();
        let proj = root.path().join("proj");
        for sub in ["cmdtool", "libutil", "assets", ".git"] {
            fs::create_dir_all(proj.join(sub)).unwrap();
        }
        fs::write(proj.join("main.go"), "package main\n").unwrap();
        fs::write(proj.join("notes.txt"), "notes").unwrap();
        fs::write(proj.join(".hidden.go"), "package main\n").unwrap();
        (root, proj)
    }

    fn by_name(nodes: &[Node], name: &str) -> Node {
        nodes.iter().find(|n| n.name == name).unwrap().clone()
    }

    #[test]
    fn test_classifies_children() {
        let (root, proj) = workspace();
        let lister = DirectoryLister::new(root.path(), &NamePrefixResolver);
        let nodes = lister.list(&proj).unwrap();

        let mut names: Vec<_> = nodes.iter().map(|n| n.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["assets", "cmdtool", "libutil", "main.go"]);

        assert_eq!(by_name(&nodes, "cmdtool").node_type, NodeType::ExecutableUnit);
        assert_eq!(by_name(&nodes, "libutil").node_type, NodeType::CompilableUnit);
        assert_eq!(by_name(&nodes, "assets").node_type, NodeType::Folder);

        let file = by_name(&nodes, "main.go");
        assert_eq!(file.node_type, NodeType::SourceFile);
        assert_eq!(file.value, Some("package main\n".len() as u64));
        assert_eq!(file.loc, "proj/main.go");
        assert_eq!(file.dir, proj.to_string_lossy());
        assert_eq!(file.id, proj.join("main.go").to_string_lossy());
        assert_eq!(file.label, "main.go");
        assert_eq!(by_name(&nodes, "assets").value, None);
    }

    #[test]
    fn test_children_of_root_are_top_level() {
        let (root, _proj) = workspace();
        let lister = DirectoryLister::new(root.path(), &NamePrefixResolver);
        let nodes = lister.list(root.path()).unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].node_type, NodeType::TopLevel);
        assert_eq!(nodes[0].loc, "proj");
    }

    #[test]
    fn test_unreadable_directory() {
        let root = TempDir::new().unwrap();
        let lister = DirectoryLister::new(root.path(), &NamePrefixResolver);
        let err = lister.list(&root.path().join("missing")).unwrap_err();
        assert!(matches!(err, NavError::ListError { .. }));
    }
}
