//! Package-level scope and import listing of one file.

use std::collections::HashSet;

use crate::analysis::{Decl, DeclCategory, Ident, SourceFile};
use crate::node::{DeclKind, FileContext, Node};

/// Emit one node per package-level declaration, then one per import.
///
/// Methods are not part of the package scope, `init` functions and blank
/// names are never declared, and a redeclared name keeps its first
/// declaration.
pub fn extract_symbols(file: &SourceFile, ctx: &FileContext) -> Vec<Node> {
    let mut declared = HashSet::new();

    let scope = file
        .decls
        .iter()
        .filter_map(scope_entry)
        .filter(|&(ident, _)| declared.insert(ident.name.as_str()))
        .map(|(ident, kind)| Node::declaration(kind, &ident.name, ident.span.start_byte, ctx));

    let mut nodes: Vec<Node> = scope.collect();
    nodes.extend(file.imports().map(|import| Node::import(&import.path, ctx)));
    nodes
}

/// Classify a top-level declaration as a package-scope entry.
fn scope_entry(decl: &Decl) -> Option<(&Ident, DeclKind)> {
    let (ident, kind) = match decl {
        Decl::Function(func) if func.is_method() || func.name.name == "init" => return None,
        Decl::Function(func) => (&func.name, DeclKind::Func),
        Decl::Struct(s) => (&s.name, DeclKind::Struct),
        Decl::Interface(i) => (&i.name, DeclKind::Interface),
        Decl::Other(other) => (&other.name, category_kind(other.category)),
        Decl::Import(_) => return None,
    };
    if ident.is_blank() {
        return None;
    }
    Some((ident, kind))
}

fn category_kind(category: DeclCategory) -> DeclKind {
    match category {
        DeclCategory::Var => DeclKind::Var,
        DeclCategory::Const => DeclKind::Const,
        DeclCategory::TypeAlias => DeclKind::TypeAlias,
    }
}
