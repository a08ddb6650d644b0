//! The flat node record returned for every request.
//!
//! A node describes either a filesystem entry (folder, package, program,
//! source file) or a declaration found inside a Go source file. Nodes never
//! nest: parent/child relationships are implied by `Dir` and `Loc`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of a node as understood by the visualizer.
///
/// Serialized with the visualizer's vocabulary (`topLevel`, `package`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Any child of the workspace root.
    #[serde(rename = "topLevel")]
    TopLevel,
    /// Directory that is not a Go package.
    #[serde(rename = "folder")]
    Folder,
    /// Directory holding a buildable Go package.
    #[serde(rename = "package")]
    CompilableUnit,
    /// Directory holding package `main`.
    #[serde(rename = "program")]
    ExecutableUnit,
    /// A `.go` file.
    #[serde(rename = "source")]
    SourceFile,
    /// A declaration, import or method inside a source file.
    #[serde(rename = "object")]
    Declaration,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::TopLevel => "topLevel",
            NodeType::Folder => "folder",
            NodeType::CompilableUnit => "package",
            NodeType::ExecutableUnit => "program",
            NodeType::SourceFile => "source",
            NodeType::Declaration => "object",
        }
    }

    /// True for nodes describing filesystem entries.
    pub fn is_filesystem(&self) -> bool {
        !matches!(self, NodeType::Declaration)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifier of a declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclKind {
    Func,
    Var,
    Const,
    TypeAlias,
    Struct,
    Interface,
    Import,
    Method,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Func => "func",
            DeclKind::Var => "var",
            DeclKind::Const => "const",
            DeclKind::TypeAlias => "type-alias",
            DeclKind::Struct => "struct",
            DeclKind::Interface => "interface",
            DeclKind::Import => "import",
            DeclKind::Method => "method",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the declaration nodes of one analysed file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    /// Absolute path of the analysed file.
    pub dir: String,
    /// File path relative to the workspace root.
    pub loc: String,
}

/// A single output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Node {
    #[serde(rename = "Type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DeclKind>,
    pub name: String,
    pub loc: String,
    pub dir: String,
    /// Absolute path, source byte offset, or import path depending on the node.
    pub id: String,
    pub label: String,
    /// Size in bytes, files only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
}

impl Node {
    /// Filesystem entry found while listing `dir`.
    pub fn entry(
        node_type: NodeType,
        path: String,
        name: String,
        dir: String,
        loc: String,
        value: Option<u64>,
    ) -> Self {
        Self {
            node_type,
            kind: None,
            label: name.clone(),
            name,
            loc,
            dir,
            id: path,
            value,
        }
    }

    /// Declaration identified by its byte offset in the file.
    pub fn declaration(kind: DeclKind, name: &str, offset: usize, ctx: &FileContext) -> Self {
        Self::symbol(kind, kind.as_str(), name, offset.to_string(), ctx)
    }

    /// Method declared in an interface's method set.
    pub fn interface_method(name: &str, offset: usize, ctx: &FileContext) -> Self {
        Self::symbol(
            DeclKind::Method,
            "interface-method",
            name,
            offset.to_string(),
            ctx,
        )
    }

    /// Import spec, identified by its path.
    pub fn import(path: &str, ctx: &FileContext) -> Self {
        Self {
            node_type: NodeType::Declaration,
            kind: Some(DeclKind::Import),
            name: path.to_string(),
            loc: ctx.loc.clone(),
            dir: ctx.dir.clone(),
            id: path.to_string(),
            label: path.to_string(),
            value: None,
        }
    }

    fn symbol(kind: DeclKind, tag: &str, name: &str, id: String, ctx: &FileContext) -> Self {
        Self {
            node_type: NodeType::Declaration,
            kind: Some(kind),
            name: name.to_string(),
            loc: ctx.loc.clone(),
            dir: ctx.dir.clone(),
            id,
            label: format!("{}\n{}", tag, name),
            value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> FileContext {
        FileContext {
            dir: "/ws/src/app/main.go".to_string(),
            loc: "app/main.go".to_string(),
        }
    }

    #[test]
    fn test_declaration_label_and_id() {
        let node = Node::declaration(DeclKind::Struct, "Config", 42, &ctx());
        assert_eq!(node.node_type, NodeType::Declaration);
        assert_eq!(node.kind, Some(DeclKind::Struct));
        assert_eq!(node.label, "struct\nConfig");
        assert_eq!(node.id, "42");
        assert_eq!(node.loc, "app/main.go");
        assert_eq!(node.value, None);
    }

    #[test]
    fn test_interface_method_label() {
        let node = Node::interface_method("Area", 7, &ctx());
        assert_eq!(node.kind, Some(DeclKind::Method));
        assert_eq!(node.label, "interface-method\nArea");
    }

    #[test]
    fn test_import_uses_path_everywhere() {
        let node = Node::import("net/http", &ctx());
        assert_eq!(node.kind, Some(DeclKind::Import));
        assert_eq!(node.name, "net/http");
        assert_eq!(node.label, "net/http");
        assert_eq!(node.id, "net/http");
    }

    #[test]
    fn test_json_field_names() {
        let node = Node::entry(
            NodeType::CompilableUnit,
            "/ws/src/lib".to_string(),
            "lib".to_string(),
            "/ws/src".to_string(),
            "lib".to_string(),
            None,
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["Type"], "package");
        assert_eq!(json["Id"], "/ws/src/lib");
        assert_eq!(json["Label"], "lib");
        assert!(json.get("Kind").is_none());
        assert!(json.get("Value").is_none());
    }

    #[test]
    fn test_kind_wire_names() {
        let json = serde_json::to_string(&DeclKind::TypeAlias).unwrap();
        assert_eq!(json, "\"type-alias\"");
        assert_eq!(DeclKind::TypeAlias.as_str(), "type-alias");
        assert!(NodeType::SourceFile.is_filesystem());
        assert!(!NodeType::Declaration.is_filesystem());
    }
}
